//! Dashboard page: KPIs, enriched products, monthly sales and revenue per
//! quality tier

use crate::cache::CacheTtl;
use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::{DashboardFiche, ProductFilters};
use crate::error::{ExportError, Result};
use crate::export::{ExportFormat, Sheet};
use crate::models::{
    EnrichedProductDisplay, MatchDisplay, MonthlyTotalDisplay, QualityRevenueDisplay,
};
use crate::output::Formattable;
use crate::output::formatters::{format_currency, format_pourcentage};
use crate::output::table::format_pairs;
use crate::query::FeatureQuery;
use crate::transform::dashboard::{DashboardView, summarize};

pub const PAGE: Page = Page::new("dashboard", "Dashboard", "dashboard");

/// Run the dashboard page
pub async fn run(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    let options = ctx.options(Some(CacheTtl::SALES));
    let Some(state) = page::load(ctx, &PAGE, filters, options, || {
        ctx.services.dashboard.get_fiche(filters)
    })
    .await?
    else {
        return Ok(());
    };

    let mut query = FeatureQuery::new(summarize);
    let Some(view) = query.apply(&state) else {
        return Ok(());
    };

    match ctx.format {
        OutputFormat::Json => page::emit_json(view.as_ref(), filters, state.from_cache)?,
        OutputFormat::Table => {
            let rows: Vec<EnrichedProductDisplay> =
                view.products.iter().map(EnrichedProductDisplay::from).collect();
            rows.print(ctx.format)?;
        }
        OutputFormat::Pretty => {
            if let Some(fiche) = state.data.as_deref() {
                render(&view, fiche, state.from_cache)?;
            }
        }
    }

    match (ctx.export, state.data.as_deref()) {
        (Some(ExportFormat::Xlsx), Some(fiche)) => {
            page::export_workbook(ctx, PAGE.export_name, sheets(&view, fiche));
        }
        _ => page::export_items(ctx, PAGE.export_name, &view.products),
    }
    Ok(())
}

/// Workbook layout: the enriched products, then the raw details, sales
/// and stock rows
fn sheets(
    view: &DashboardView,
    fiche: &DashboardFiche,
) -> std::result::Result<Vec<Sheet>, ExportError> {
    Ok(vec![
        Sheet::new("Products", &view.products)?,
        Sheet::new("Details", &fiche.details)?,
        Sheet::new("Sales", &fiche.sales)?,
        Sheet::new("Stock", &fiche.stock)?,
    ])
}

fn kpi_pairs(view: &DashboardView) -> Vec<(&'static str, String)> {
    let kpis = &view.kpis;
    vec![
        ("Products", kpis.total_products.to_string()),
        ("Revenue", format_currency(Some(kpis.total_revenue), true)),
        ("Average margin", format_pourcentage(Some(kpis.average_margin))),
    ]
}

fn render(view: &DashboardView, fiche: &DashboardFiche, cached: bool) -> Result<()> {
    if fiche.is_empty() {
        layout::no_data();
        return Ok(());
    }

    println!("{}", format_pairs(&kpi_pairs(view)));

    layout::section("Products");
    let products: Vec<EnrichedProductDisplay> =
        view.products.iter().map(EnrichedProductDisplay::from).collect();
    products.print(OutputFormat::Pretty)?;

    if !view.monthly.is_empty() {
        layout::section("Monthly sales");
        let monthly: Vec<MonthlyTotalDisplay> =
            view.monthly.iter().map(MonthlyTotalDisplay::from).collect();
        monthly.print(OutputFormat::Pretty)?;
    }

    if !view.by_quality.is_empty() {
        layout::section("Revenue by quality");
        let tiers: Vec<QualityRevenueDisplay> =
            view.by_quality.iter().map(QualityRevenueDisplay::from).collect();
        tiers.print(OutputFormat::Pretty)?;
    }

    if !fiche.matches.is_empty() {
        layout::section("Reference matches");
        let matches: Vec<MatchDisplay> = fiche.matches.iter().map(MatchDisplay::from).collect();
        matches.print(OutputFormat::Pretty)?;
    }

    if cached {
        println!();
        layout::note("(from cache)");
    }
    Ok(())
}
