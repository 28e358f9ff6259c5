//! Product pages: master data, reference matches, CRN group matrix and the
//! combined product analysis

use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cache::CacheTtl;
use crate::classify::{quality_badge, status_color, status_label};
use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::{
    ProductDetail, ProductDetailList, ProductFilters, ProductMatchList, ProductMatrix,
    PurchasePrice, SalesAggregate, SalesHistory, StockItem,
};
use crate::error::{ApiError, Error, Result};
use crate::models::{
    MatchDisplay, MonthlyTotalDisplay, ProductDisplay, PurchasePriceDisplay, ReferenceDisplay,
    SalesAggregateDisplay, StockDisplay, codes_summary,
};
use crate::output::Formattable;
use crate::output::formatters::or_dash;
use crate::output::table::format_pairs;
use crate::transform::dashboard::monthly_totals;

pub const DETAILS: Page = Page::new("product_details", "Products", "produits");
const DETAIL: Page = Page::new("product_detail", "Product", "produit");
const MATCHES: Page = Page::new("product_match", "Reference matches", "correspondances");
const MATRIX: Page = Page::new("product_matrix", "CRN group", "groupe_crn");
const ANALYSIS: Page = Page::new("product_analysis", "Product analysis", "analyse_produits");

/// Everything the analysis page shows, fetched concurrently
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub products: Vec<ProductDetail>,
    pub sales: Vec<SalesAggregate>,
    pub history: Vec<SalesHistory>,
    pub stock: Vec<StockItem>,
    pub prices: Vec<PurchasePrice>,
}

/// List products matching the filters
pub async fn details(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    page::run_list_page::<_, _, ProductDisplay, _, _>(
        ctx,
        &DETAILS,
        filters,
        ctx.options(Some(CacheTtl::PRODUCT_DETAILS)),
        || ctx.services.product.get_details(filters),
        |list: &ProductDetailList| list.products.as_slice(),
    )
    .await
}

/// Show one product
pub async fn detail(ctx: &CommandContext, cod_pro: i64) -> Result<()> {
    let filters = ProductFilters::for_cod_pro(cod_pro);
    let Some(state) = page::load(
        ctx,
        &DETAIL,
        &filters,
        ctx.options(Some(CacheTtl::PRODUCT_DETAILS)),
        || ctx.services.product.get_single_detail(cod_pro),
    )
    .await?
    else {
        return Ok(());
    };

    let Some(product) = state.data.as_deref().and_then(Option::as_ref) else {
        return Err(ApiError::NotFound(format!("product {}", cod_pro)).into());
    };

    match ctx.format {
        OutputFormat::Json => page::emit_json(product, &filters, state.from_cache)?,
        OutputFormat::Table => vec![ProductDisplay::from(product)].print(ctx.format)?,
        OutputFormat::Pretty => render_detail(product),
    }

    page::export_items(ctx, DETAIL.export_name, std::slice::from_ref(product));
    Ok(())
}

fn render_detail(product: &ProductDetail) {
    let row = ProductDisplay::from(product);
    println!(
        "{} {}",
        row.refint.bold(),
        quality_badge(product.qualite.as_deref())
    );
    println!(
        "Status: {}",
        status_label(product.statut).color(status_color(product.statut))
    );
    println!("{}", codes_summary(product).dimmed());
    println!();
    println!(
        "{}",
        format_pairs(&[
            ("COD_PRO", row.cod_pro.to_string()),
            ("External ref", row.ref_ext),
            ("Family", row.famille),
            ("Supplier", row.fournisseur),
        ])
    );
}

/// List manufacturer and external reference matches
pub async fn matches(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    page::run_list_page::<_, _, MatchDisplay, _, _>(
        ctx,
        &MATCHES,
        filters,
        ctx.options(Some(CacheTtl::PRODUCT_DETAILS)),
        || ctx.services.product.get_matches(filters),
        |list: &ProductMatchList| list.matches.as_slice(),
    )
    .await
}

/// Reference rows of a CRN group, for export
fn matrix_rows(matrix: &ProductMatrix) -> Vec<Value> {
    let crn = matrix
        .ref_crn_list
        .iter()
        .map(|r| json!({"type": "ref_crn", "reference": r}));
    let ext = matrix
        .ref_ext_list
        .iter()
        .map(|r| json!({"type": "ref_ext", "reference": r}));
    crn.chain(ext).collect()
}

/// Show the product codes and reference lists of a CRN group
pub async fn matrix(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    let Some(state) = page::load(
        ctx,
        &MATRIX,
        filters,
        ctx.options(Some(CacheTtl::MATRIX)),
        || ctx.services.product.get_matrix(filters),
    )
    .await?
    else {
        return Ok(());
    };
    let Some(matrix) = state.data.as_deref() else {
        return Ok(());
    };

    match ctx.format {
        OutputFormat::Json => page::emit_json(matrix, filters, state.from_cache)?,
        OutputFormat::Pretty | OutputFormat::Table => {
            let codes: Vec<String> = matrix.cod_pro_list.iter().map(i64::to_string).collect();
            println!(
                "{}",
                format_pairs(&[
                    (
                        "CRN group",
                        matrix
                            .groupe_crn
                            .map_or_else(|| "-".to_string(), |g| g.to_string())
                    ),
                    ("Products", or_dash(Some(codes.join(", ").as_str()))),
                    ("CRN references", matrix.ref_crn_list.len().to_string()),
                    ("External references", matrix.ref_ext_list.len().to_string()),
                ])
            );

            layout::section("CRN references");
            let crn: Vec<ReferenceDisplay> =
                matrix.ref_crn_list.iter().map(ReferenceDisplay::from).collect();
            crn.print(ctx.format)?;

            layout::section("External references");
            let ext: Vec<ReferenceDisplay> =
                matrix.ref_ext_list.iter().map(ReferenceDisplay::from).collect();
            ext.print(ctx.format)?;
        }
    }

    page::export_items(ctx, MATRIX.export_name, &matrix_rows(matrix));
    Ok(())
}

/// Details, sales, history, stock and prices of the filtered products.
///
/// The five calls are independent and run concurrently; the first failure
/// fails the page.
pub async fn analyze(
    ctx: &CommandContext,
    filters: &ProductFilters,
    months: Option<u32>,
) -> Result<()> {
    let months = ctx.history_months(months);
    let options = ctx
        .options(Some(CacheTtl::SALES))
        .with_param("last_n_months", months);

    let Some(state) = page::load(ctx, &ANALYSIS, filters, options, move || async move {
        let services = &ctx.services;
        let (details, sales, history, stock, prices) = futures::try_join!(
            services.product.get_details(filters),
            services.sales.get_aggregate(filters),
            services.sales.get_history(filters, months),
            services.stock.get_current(filters),
            services.purchase.get_prices(filters),
        )?;
        Ok::<_, Error>(ProductAnalysis {
            products: details.products,
            sales: sales.items,
            history: history.items,
            stock: stock.items,
            prices: prices.items,
        })
    })
    .await?
    else {
        return Ok(());
    };
    let Some(analysis) = state.data.as_deref() else {
        return Ok(());
    };

    match ctx.format {
        OutputFormat::Json => page::emit_json(analysis, filters, state.from_cache)?,
        OutputFormat::Pretty | OutputFormat::Table => render_analysis(analysis, ctx.format)?,
    }

    page::export_items(ctx, ANALYSIS.export_name, &analysis.sales);
    Ok(())
}

fn render_analysis(analysis: &ProductAnalysis, format: OutputFormat) -> Result<()> {
    layout::section("Products");
    let products: Vec<ProductDisplay> = analysis.products.iter().map(ProductDisplay::from).collect();
    products.print(format)?;

    layout::section("Sales");
    let sales: Vec<SalesAggregateDisplay> =
        analysis.sales.iter().map(SalesAggregateDisplay::from).collect();
    sales.print(format)?;

    layout::section("Monthly sales");
    let monthly: Vec<MonthlyTotalDisplay> = monthly_totals(&analysis.history)
        .iter()
        .map(MonthlyTotalDisplay::from)
        .collect();
    monthly.print(format)?;

    layout::section("Stock");
    let stock: Vec<StockDisplay> = analysis.stock.iter().map(StockDisplay::from).collect();
    stock.print(format)?;

    layout::section("Purchase prices");
    let prices: Vec<PurchasePriceDisplay> =
        analysis.prices.iter().map(PurchasePriceDisplay::from).collect();
    prices.print(format)?;

    Ok(())
}
