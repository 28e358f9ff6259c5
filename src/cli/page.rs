//! Page loading
//!
//! Every page follows the same flow:
//! 1. Print the header (pretty mode)
//! 2. Fetch through the query client behind a spinner
//! 3. Show the empty state when no filter is active
//! 4. Convert to display rows and print, or print the raw payload as JSON
//! 5. Export the raw rows when `--export` is set

use std::future::Future;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::ProductFilters;
use crate::error::{ExportError, Result};
use crate::export::{self, ExportFormat, Sheet};
use crate::output::Formattable;
use crate::output::json::JsonOutput;
use crate::query::{QueryOptions, QueryState};

const EMPTY_HINT: &str = "Pass a filter such as --cod-pro, --refint or --ref-crn to load data";

/// A page: its cache feature, title and export file prefix
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub feature: &'static str,
    pub title: &'static str,
    pub export_name: &'static str,
}

impl Page {
    pub const fn new(feature: &'static str, title: &'static str, export_name: &'static str) -> Self {
        Self {
            feature,
            title,
            export_name,
        }
    }
}

/// Fetch a page's payload.
///
/// Returns `Ok(None)` when there is nothing to render (no active filter, or
/// the response was overtaken). The state returned always carries data.
pub async fn load<T, F, Fut>(
    ctx: &CommandContext,
    page: &Page,
    filters: &ProductFilters,
    options: QueryOptions,
    fetcher: F,
) -> Result<Option<QueryState<T>>>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let pretty = ctx.format.is_pretty();
    if pretty {
        layout::header(page.title, Some(filters));
    }

    let spinner = layout::spinner(&format!("Loading {}...", page.title.to_lowercase()), pretty);
    let mut state = ctx.query.fetch(page.feature, filters, options, fetcher).await;
    spinner.finish_and_clear();

    if let Some(err) = state.error.take() {
        return Err(err);
    }
    if state.is_stale {
        log::debug!("{}: newer response already shown", page.feature);
        return Ok(None);
    }
    if !state.has_data() {
        if !state.has_active_filters {
            show_empty(ctx, filters)?;
        }
        return Ok(None);
    }

    log::debug!("{}: loaded (cached: {})", page.feature, state.from_cache);
    Ok(Some(state))
}

fn show_empty(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => emit_json(&Value::Null, filters, false),
        OutputFormat::Pretty | OutputFormat::Table => {
            layout::empty_state(EMPTY_HINT);
            Ok(())
        }
    }
}

/// Print `data` in the JSON envelope with the filter summary
pub fn emit_json<T: Serialize + ?Sized>(
    data: &T,
    filters: &ProductFilters,
    cached: bool,
) -> Result<()> {
    let output = JsonOutput::new(data)
        .with_filters(filters.summary())
        .cached(cached);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Export `items` when `--export` is set. Failures are reported but do not
/// fail the page.
pub fn export_items<T: Serialize + ?Sized>(ctx: &CommandContext, name: &str, items: &T) {
    let Some(format) = ctx.export else {
        return;
    };

    report_export(export::export(items, name, &ctx.output_dir, format, &ctx.csv_options()));
}

/// Export several row sets as one workbook, a sheet each. Only used when
/// `--export xlsx` is set; other formats export the page's main rows.
pub fn export_workbook(
    ctx: &CommandContext,
    name: &str,
    sheets: std::result::Result<Vec<Sheet>, ExportError>,
) {
    if ctx.export != Some(ExportFormat::Xlsx) {
        return;
    }
    report_export(
        sheets.and_then(|sheets| {
            export::export_xlsx(&sheets, name, &ctx.output_dir, &ctx.csv_options())
        }),
    );
}

fn report_export(result: std::result::Result<PathBuf, ExportError>) {
    match result {
        Ok(path) => eprintln!("{} Exported to {}", "✓".green(), path.display()),
        Err(e) => layout::warning(&format!("Export failed: {}", e)),
    }
}

/// Row count and data source under a table
pub fn footer(count: usize, cached: bool) -> String {
    let noun = if count == 1 { "row" } else { "rows" };
    if cached {
        format!("{} {} (from cache)", count, noun)
    } else {
        format!("{} {}", count, noun)
    }
}

/// Print rows as a table of `D`, or as raw JSON, then export them
pub fn render_rows<T, D>(
    ctx: &CommandContext,
    page: &Page,
    filters: &ProductFilters,
    rows: &[T],
    cached: bool,
) -> Result<()>
where
    T: Serialize,
    D: for<'a> From<&'a T> + Tabled + Serialize,
{
    match ctx.format {
        OutputFormat::Json => emit_json(rows, filters, cached)?,
        OutputFormat::Pretty | OutputFormat::Table => {
            let display: Vec<D> = rows.iter().map(D::from).collect();
            display.print(ctx.format)?;
            if ctx.format.is_pretty() && !rows.is_empty() {
                layout::note(&footer(rows.len(), cached));
            }
        }
    }

    export_items(ctx, page.export_name, rows);
    Ok(())
}

/// Run a standard list page: fetch → pick rows → display → export.
///
/// # Type Parameters
///
/// * `P` - Payload returned by the service (e.g. `SalesAggregateList`)
/// * `T` - Row model inside the payload
/// * `D` - Display row built from `&T`
pub async fn run_list_page<P, T, D, F, Fut>(
    ctx: &CommandContext,
    page: &Page,
    filters: &ProductFilters,
    options: QueryOptions,
    fetcher: F,
    rows: fn(&P) -> &[T],
) -> Result<()>
where
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
    T: Serialize,
    D: for<'a> From<&'a T> + Tabled + Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let Some(state) = load(ctx, page, filters, options, fetcher).await? else {
        return Ok(());
    };
    let Some(payload) = state.data.as_deref() else {
        return Ok(());
    };

    let items = rows(payload);
    log::debug!("Fetched {} {}", items.len(), page.feature);
    render_rows::<T, D>(ctx, page, filters, items, state.from_cache)
}
