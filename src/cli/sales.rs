//! Sales pages

use crate::cache::CacheTtl;
use crate::cli::CommandContext;
use crate::cli::page::{self, Page};
use crate::client::models::{ProductFilters, SalesAggregateList, SalesHistoryList};
use crate::error::Result;
use crate::models::{SalesAggregateDisplay, SalesHistoryDisplay};

const HISTORY: Page = Page::new("sales_history", "Sales history", "historique_ventes");
const AGGREGATE: Page = Page::new("sales_aggregate", "Sales", "ventes");

/// Monthly sales over the last `months` months (config default otherwise)
pub async fn history(
    ctx: &CommandContext,
    filters: &ProductFilters,
    months: Option<u32>,
) -> Result<()> {
    let months = ctx.history_months(months);
    let options = ctx
        .options(Some(CacheTtl::SALES))
        .with_param("last_n_months", months);

    page::run_list_page::<_, _, SalesHistoryDisplay, _, _>(
        ctx,
        &HISTORY,
        filters,
        options,
        || ctx.services.sales.get_history(filters, months),
        |list: &SalesHistoryList| list.items.as_slice(),
    )
    .await
}

pub async fn aggregate(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    page::run_list_page::<_, _, SalesAggregateDisplay, _, _>(
        ctx,
        &AGGREGATE,
        filters,
        ctx.options(Some(CacheTtl::SALES)),
        || ctx.services.sales.get_aggregate(filters),
        |list: &SalesAggregateList| list.items.as_slice(),
    )
    .await
}
