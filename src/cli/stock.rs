//! Stock pages

use crate::cache::CacheTtl;
use crate::cli::CommandContext;
use crate::cli::page::{self, Page};
use crate::client::models::{ProductFilters, StockHistoryList, StockList};
use crate::error::Result;
use crate::models::{StockDisplay, StockHistoryDisplay};

const CURRENT: Page = Page::new("stock_current", "Stock", "stock");
const HISTORY: Page = Page::new("stock_history", "Stock history", "historique_stock");

pub async fn current(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    page::run_list_page::<_, _, StockDisplay, _, _>(
        ctx,
        &CURRENT,
        filters,
        ctx.options(Some(CacheTtl::STOCK)),
        || ctx.services.stock.get_current(filters),
        |list: &StockList| list.items.as_slice(),
    )
    .await
}

pub async fn history(
    ctx: &CommandContext,
    filters: &ProductFilters,
    months: Option<u32>,
) -> Result<()> {
    let months = ctx.history_months(months);
    let options = ctx
        .options(Some(CacheTtl::STOCK))
        .with_param("last_n_months", months);

    page::run_list_page::<_, _, StockHistoryDisplay, _, _>(
        ctx,
        &HISTORY,
        filters,
        options,
        || ctx.services.stock.get_history(filters, months),
        |list: &StockHistoryList| list.items.as_slice(),
    )
    .await
}
