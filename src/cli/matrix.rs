//! Correspondence matrix pages

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheTtl;
use crate::classify::match_level;
use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::{MatrixCell, MatrixView, MatrixViewFilter, ProductFilters};
use crate::error::{ApiError, Error, Result};
use crate::models::{CorrespondenceDisplay, MatrixColumnDisplay};
use crate::output::Formattable;
use crate::output::formatters::format_percentage;
use crate::output::table::format_pairs;
use crate::query::FeatureQuery;
use crate::transform::matrix::{MatrixSummary, summary};

pub const VIEW: Page = Page::new("matrix_view", "Product matrix", "matrice");
const FILTERED: Page = Page::new("matrix_view_filtered", "Product matrix", "matrice");
const CELL: Page = Page::new("matrix_cell", "Matrix cell", "cellule");

#[derive(Serialize)]
struct MatrixReport<'a> {
    summary: &'a MatrixSummary,
    matrix: &'a MatrixView,
}

/// Matrix view, narrowed server-side when `extra` carries criteria
pub async fn view(
    ctx: &CommandContext,
    filters: &ProductFilters,
    extra: &MatrixViewFilter,
) -> Result<()> {
    let options = ctx.options(Some(CacheTtl::MATRIX));

    let state = if extra.is_empty() {
        page::load(ctx, &VIEW, filters, options, || {
            ctx.services.matrix.get_view(filters)
        })
        .await?
    } else {
        let options = options.with_param("view", serde_json::to_string(extra)?);
        page::load(ctx, &FILTERED, filters, options, || {
            ctx.services.matrix.get_view_filtered(filters, extra)
        })
        .await?
    };
    let Some(state) = state else {
        return Ok(());
    };

    let mut query = FeatureQuery::new(summary);
    let (Some(report), Some(matrix)) = (query.apply(&state), state.data.as_deref()) else {
        return Ok(());
    };

    match ctx.format {
        OutputFormat::Json => {
            let data = MatrixReport {
                summary: &report,
                matrix,
            };
            page::emit_json(&data, filters, state.from_cache)?;
        }
        OutputFormat::Table => {
            CorrespondenceDisplay::for_view(matrix).print(ctx.format)?;
        }
        OutputFormat::Pretty => render(&report, matrix, state.from_cache)?,
    }

    page::export_items(ctx, VIEW.export_name, &matrix.correspondences);
    Ok(())
}

fn summary_pairs(report: &MatrixSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Products", report.total_products.to_string()),
        ("Columns", report.total_columns.to_string()),
        ("Correspondences", report.total_correspondences.to_string()),
    ]
}

fn count_pairs(counts: &BTreeMap<String, usize>) -> Vec<(&str, String)> {
    counts
        .iter()
        .map(|(key, count)| (key.as_str(), count.to_string()))
        .collect()
}

fn render(report: &MatrixSummary, matrix: &MatrixView, cached: bool) -> Result<()> {
    if matrix.products.is_empty() {
        layout::no_data();
        return Ok(());
    }

    println!("{}", format_pairs(&summary_pairs(report)));
    let rate = Some(report.match_rate);
    println!(
        "Match rate: {}",
        match_level(rate).paint(&format_percentage(rate, 1, false))
    );

    if !report.by_quality.is_empty() {
        layout::section("Products by quality");
        println!("{}", format_pairs(&count_pairs(&report.by_quality)));
    }
    if !report.by_column_type.is_empty() {
        layout::section("Columns by type");
        println!("{}", format_pairs(&count_pairs(&report.by_column_type)));
    }

    layout::section("Columns");
    MatrixColumnDisplay::for_view(matrix).print(OutputFormat::Pretty)?;

    layout::section("Correspondences");
    CorrespondenceDisplay::for_view(matrix).print(OutputFormat::Pretty)?;

    if cached {
        layout::note("(from cache)");
    }
    Ok(())
}

fn cell_pairs(cell: &MatrixCell) -> Vec<(&str, String)> {
    let mut pairs = vec![
        ("COD_PRO", cell.cod_pro.to_string()),
        ("REFERENCE", cell.reference.clone()),
        ("MESSAGE", cell.message.clone().unwrap_or_else(|| "-".into())),
    ];
    for (key, value) in &cell.extra {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        pairs.push((key.as_str(), text));
    }
    pairs
}

/// Detail of the cell at product `cod_pro` and column `reference`
pub async fn cell(ctx: &CommandContext, cod_pro: i64, reference: &str) -> Result<()> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::Other("Reference must not be empty".to_string()));
    }

    let filters = ProductFilters::for_cod_pro(cod_pro);
    let options = ctx
        .options(Some(CacheTtl::MATRIX))
        .with_param("ref", reference);
    let Some(state) = page::load(ctx, &CELL, &filters, options, || {
        ctx.services.matrix.get_cell(cod_pro, reference)
    })
    .await?
    else {
        return Ok(());
    };
    let Some(cell) = state.data.as_deref() else {
        return Err(ApiError::NotFound(format!("cell {}/{}", cod_pro, reference)).into());
    };

    match ctx.format {
        OutputFormat::Json => page::emit_json(cell, &filters, state.from_cache)?,
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{}", format_pairs(&cell_pairs(cell)));
            if ctx.format.is_pretty() && state.from_cache {
                layout::note("(from cache)");
            }
        }
    }

    page::export_items(ctx, CELL.export_name, &[cell]);
    Ok(())
}
