//! Reference autocomplete
//!
//! One-shot lookups print a single table. With `--watch`, queries are read
//! from stdin one per line and only a query left untouched for the
//! configured debounce delay is looked up.

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cache::CacheTtl;
use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::ProductFilters;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::models::{ReferenceDisplay, SuggestionDisplay};
use crate::output::Formattable;
use crate::output::json::JsonOutput;
use crate::query::QueryOptions;

const BY_CODPRO: Page = Page::new(
    "suggest_refcrn_by_codpro",
    "Manufacturer references",
    "references_crn",
);

/// Which reference list to complete against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestKind {
    Refint,
    RefCrn,
    RefExt,
}

impl SuggestKind {
    fn feature(&self) -> &'static str {
        match self {
            SuggestKind::Refint => "suggest_refint",
            SuggestKind::RefCrn => "suggest_refcrn",
            SuggestKind::RefExt => "suggest_refext",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            SuggestKind::Refint => "Internal references",
            SuggestKind::RefCrn => "Manufacturer references",
            SuggestKind::RefExt => "External references",
        }
    }
}

fn options(ctx: &CommandContext, query: &str) -> QueryOptions {
    ctx.options(Some(CacheTtl::SUGGESTIONS))
        .without_filters()
        .with_param("query", query)
}

/// Run a suggestion command
pub async fn run(
    ctx: &CommandContext,
    kind: SuggestKind,
    query: Option<&str>,
    watch: bool,
) -> Result<()> {
    if watch {
        return watch_stdin(ctx, kind).await;
    }

    if ctx.format.is_pretty() {
        layout::header(kind.title(), None);
    }
    match query {
        Some(query) => show(ctx, kind, query, true).await,
        None => Ok(()),
    }
}

/// Look up and print suggestions for one query. Blank queries are skipped.
async fn show(ctx: &CommandContext, kind: SuggestKind, query: &str, export: bool) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        log::debug!("{}: blank query skipped", kind.feature());
        return Ok(());
    }

    let filters = ProductFilters::default();
    let service = &ctx.services.suggestion;

    match kind {
        SuggestKind::Refint => {
            let state = ctx
                .query
                .fetch(kind.feature(), &filters, options(ctx, query), || {
                    service.refint_or_codpro(query)
                })
                .await;
            if let Some(rows) = state.into_result()? {
                print_rows::<_, SuggestionDisplay>(ctx, query, rows.as_slice(), export)?;
            }
        }
        SuggestKind::RefCrn | SuggestKind::RefExt => {
            let state = ctx
                .query
                .fetch(kind.feature(), &filters, options(ctx, query), || async {
                    if kind == SuggestKind::RefCrn {
                        service.ref_crn(query).await
                    } else {
                        service.ref_ext(query).await
                    }
                })
                .await;
            if let Some(response) = state.into_result()? {
                print_rows::<_, ReferenceDisplay>(
                    ctx,
                    query,
                    response.results.as_slice(),
                    export,
                )?;
            }
        }
    }

    Ok(())
}

fn print_rows<T, D>(ctx: &CommandContext, query: &str, rows: &[T], export: bool) -> Result<()>
where
    T: Serialize,
    D: for<'a> From<&'a T> + Tabled + Serialize,
{
    match ctx.format {
        OutputFormat::Json => {
            let output = JsonOutput::new(rows).with_filters(format!("query={}", query));
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            if ctx.format.is_pretty() {
                println!("{} {}", "→".dimmed(), query.bold());
            }
            let display: Vec<D> = rows.iter().map(D::from).collect();
            display.print(ctx.format)?;
        }
    }

    if export {
        page::export_items(ctx, "suggestions", rows);
    }
    Ok(())
}

/// Lookup errors are reported without ending the watch session
async fn settle(ctx: &CommandContext, kind: SuggestKind, query: &str) {
    if let Err(e) = show(ctx, kind, query, false).await {
        layout::report_error(&e);
    }
}

async fn watch_stdin(ctx: &CommandContext, kind: SuggestKind) -> Result<()> {
    let delay = ctx.config.preferences.debounce();
    if ctx.format.is_pretty() {
        layout::header(kind.title(), None);
        layout::note(&format!(
            "Type a query per line; lookups run after {} ms without input. Ctrl-D to stop.",
            delay.as_millis()
        ));
    }

    let mut debouncer = Debouncer::new(delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !debouncer.push(line).await {
                        break;
                    }
                }
                None => break,
            },
            Some(query) = debouncer.next() => settle(ctx, kind, &query).await,
        }
    }

    // stdin closed: the last pending query still gets its lookup
    let mut remaining = debouncer.close();
    while let Some(query) = remaining.recv().await {
        settle(ctx, kind, &query).await;
    }

    Ok(())
}

/// Manufacturer references attached to one product
pub async fn refcrn_by_codpro(ctx: &CommandContext, cod_pro: i64) -> Result<()> {
    let filters = ProductFilters::for_cod_pro(cod_pro);
    let Some(state) = page::load(
        ctx,
        &BY_CODPRO,
        &filters,
        ctx.options(Some(CacheTtl::SUGGESTIONS)),
        || ctx.services.suggestion.ref_crn_by_codpro(cod_pro),
    )
    .await?
    else {
        return Ok(());
    };
    let Some(response) = state.data.as_deref() else {
        return Ok(());
    };

    page::render_rows::<_, ReferenceDisplay>(
        ctx,
        &BY_CODPRO,
        &filters,
        response.results.as_slice(),
        state.from_cache,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::tests::mock_context;
    use crate::client::MockTransport;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_same_query_hits_cache() {
        let dir = TempDir::new().unwrap();
        let mock = MockTransport::new().with_get(
            "/suggestions/refint-codpro",
            json!([{"refint": "ABC", "cod_pro": 1}]),
        );
        let ctx = mock_context(&dir, mock.clone());

        run(&ctx, SuggestKind::Refint, Some("AB"), false).await.unwrap();
        run(&ctx, SuggestKind::Refint, Some(" AB "), false).await.unwrap();
        run(&ctx, SuggestKind::Refint, Some("ABC"), false).await.unwrap();

        assert_eq!(mock.calls_to("/suggestions/refint-codpro").await, 2);
        let last = mock.last_call().await.unwrap();
        assert_eq!(last.query_value("query"), Some("ABC"));
    }

    #[tokio::test]
    async fn test_blank_query_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mock = MockTransport::new();
        let ctx = mock_context(&dir, mock.clone());

        run(&ctx, SuggestKind::RefCrn, Some("   "), false).await.unwrap();
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_ref_ext_uses_its_endpoint() {
        let dir = TempDir::new().unwrap();
        let mock = MockTransport::new()
            .with_get("/suggestions/ref_ext", json!({"results": ["E1", "E2"]}));
        let ctx = mock_context(&dir, mock.clone());

        run(&ctx, SuggestKind::RefExt, Some("E"), false).await.unwrap();
        assert_eq!(mock.calls_to("/suggestions/ref_ext").await, 1);
    }

    #[tokio::test]
    async fn test_refcrn_by_codpro_page() {
        let dir = TempDir::new().unwrap();
        let mock = MockTransport::new().with_get(
            "/suggestions/refcrn_by_codpro",
            json!({"results": ["CRN-1"]}),
        );
        let ctx = mock_context(&dir, mock.clone());

        refcrn_by_codpro(&ctx, 5).await.unwrap();
        let call = mock.last_call().await.unwrap();
        assert_eq!(call.query_value("cod_pro"), Some("5"));
    }
}
