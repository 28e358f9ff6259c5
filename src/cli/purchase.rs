//! Purchase price page

use crate::cli::CommandContext;
use crate::cli::page::{self, Page};
use crate::client::models::{ProductFilters, PurchasePriceList};
use crate::error::Result;
use crate::models::PurchasePriceDisplay;

const PRICES: Page = Page::new("purchase_price", "Purchase prices", "prix_achat");

pub async fn price(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    page::run_list_page::<_, _, PurchasePriceDisplay, _, _>(
        ctx,
        &PRICES,
        filters,
        ctx.options(None),
        || ctx.services.purchase.get_prices(filters),
        |list: &PurchasePriceList| list.items.as_slice(),
    )
    .await
}
