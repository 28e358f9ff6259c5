//! `open` and `routes`: page navigation by path

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::optimization::AnalysisView;
use crate::cli::{
    CommandContext, GlobalOptions, OutputFormat, dashboard, layout, matrix, optimization, product,
};
use crate::client::models::MatrixViewFilter;
use crate::error::{Error, Result};
use crate::output::Formattable;
use crate::router::{self, Location, Route};

/// Route listing row
#[derive(Debug, Clone, Tabled, Serialize)]
struct RouteDisplay {
    #[tabled(rename = "PATH")]
    path: &'static str,

    #[tabled(rename = "PAGE")]
    title: &'static str,

    #[tabled(rename = "DESCRIPTION")]
    description: &'static str,
}

impl From<&Route> for RouteDisplay {
    fn from(route: &Route) -> Self {
        Self {
            path: route.path(),
            title: route.title(),
            description: route.description(),
        }
    }
}

/// List navigable pages
pub fn routes(format: OutputFormat) -> Result<()> {
    let rows: Vec<RouteDisplay> = Route::all().iter().map(RouteDisplay::from).collect();
    rows.print(format)
}

/// Open the page at `path`, e.g. `/dashboard?cod_pro=123`.
///
/// Unknown pages fail before any API configuration is needed.
pub async fn open(opts: &GlobalOptions, path: &str) -> Result<()> {
    let location = router::parse(path);
    if location.route == Route::NotFound {
        if opts.format.is_pretty() {
            not_found(path);
        }
        return Err(Error::Other(format!("No page at {}", path.trim())));
    }

    for key in &location.ignored {
        layout::warning(&format!("Ignoring query parameter '{}'", key));
    }

    let ctx = CommandContext::new(opts)?;
    show(&ctx, &location).await
}

async fn show(ctx: &CommandContext, location: &Location) -> Result<()> {
    let filters = &location.filters;
    log::debug!("Opening {:?} with {}", location.route, filters.summary());

    match location.route {
        Route::Dashboard => dashboard::run(ctx, filters).await,
        Route::Product => product::analyze(ctx, filters, None).await,
        Route::Matrix => matrix::view(ctx, filters, &MatrixViewFilter::default()).await,
        Route::Optimization => {
            optimization::analysis(ctx, filters, &AnalysisView::default()).await
        }
        Route::NotFound => Err(Error::Other("No page at this address".to_string())),
    }
}

fn not_found(path: &str) {
    layout::header(Route::NotFound.title(), None);
    println!("{} {}", "✗".red(), Route::NotFound.description());
    println!("  {}", path.trim().dimmed());
    println!();
    println!("Available pages:");
    for route in Route::all() {
        println!("  {} {}", route.path().cyan(), route.title());
    }
}
