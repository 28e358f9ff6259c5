//! Identifier resolution page

use colored::Colorize;
use serde_json::json;

use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::ProductFilters;
use crate::error::Result;

const RESOLVE: Page = Page::new("identifier_resolve", "Product codes", "cod_pro");

/// Resolve the filters' identifiers to product codes
pub async fn resolve(ctx: &CommandContext, filters: &ProductFilters) -> Result<()> {
    let Some(state) = page::load(ctx, &RESOLVE, filters, ctx.options(None), || {
        ctx.services.identifier.resolve_codpro(filters)
    })
    .await?
    else {
        return Ok(());
    };
    let Some(resolved) = state.data.as_deref() else {
        return Ok(());
    };
    let codes = &resolved.cod_pro_list;

    match ctx.format {
        OutputFormat::Json => page::emit_json(resolved, filters, state.from_cache)?,
        OutputFormat::Table => {
            for code in codes {
                println!("{}", code);
            }
        }
        OutputFormat::Pretty => {
            if codes.is_empty() {
                layout::no_data();
            } else {
                let noun = if codes.len() == 1 { "product" } else { "products" };
                println!("{} {}", codes.len().to_string().bold(), noun);
                let list: Vec<String> = codes.iter().map(i64::to_string).collect();
                println!("  {}", list.join(", "));
                if state.from_cache {
                    layout::note("(from cache)");
                }
            }
        }
    }

    let rows: Vec<_> = codes.iter().map(|c| json!({ "cod_pro": c })).collect();
    page::export_items(ctx, RESOLVE.export_name, &rows);
    Ok(())
}
