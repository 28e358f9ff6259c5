//! cbmx - terminal client for the CBM product explorer

use clap::{CommandFactory, Parser};

mod cache;
mod classify;
mod cli;
mod client;
mod config;
mod debounce;
mod error;
mod export;
mod models;
mod output;
mod query;
mod router;
mod services;
mod transform;

use cli::suggest::SuggestKind;
use cli::{
    CacheCommands, Cli, CommandContext, Commands, GlobalOptions, IdentifierCommands,
    MatrixCommands, OptimizationCommands, ProductCommands, PurchaseCommands, SalesCommands,
    StockCommands, SuggestCommands,
};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        cli::layout::report_error(&err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("cbmx version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Routes => cli::navigation::routes(opts.format),
        Commands::Open { path } => cli::navigation::open(&opts, &path).await,
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(opts.format),
            CacheCommands::Clear => cli::cache::clear(opts.format),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cbmx", &mut std::io::stdout());
            Ok(())
        }
        command => {
            let ctx = CommandContext::new(&opts)?;
            let result = run_page(&ctx, command).await;
            if let Ok(stats) = ctx.query.stats() {
                log::debug!(
                    "Cache: {} hits, {} misses ({:.0}% hit rate)",
                    stats.hits,
                    stats.misses,
                    stats.hit_rate()
                );
            }
            result
        }
    }
}

/// Commands that talk to the API
async fn run_page(ctx: &CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Dashboard { filters } => cli::dashboard::run(ctx, &filters.to_filters()).await,
        Commands::Product(cmd) => match cmd {
            ProductCommands::Details { filters } => {
                cli::product::details(ctx, &filters.to_filters()).await
            }
            ProductCommands::Detail { cod_pro } => cli::product::detail(ctx, cod_pro).await,
            ProductCommands::Match { filters } => {
                cli::product::matches(ctx, &filters.to_filters()).await
            }
            ProductCommands::Matrix { filters } => {
                cli::product::matrix(ctx, &filters.to_filters()).await
            }
            ProductCommands::Analyze { filters, months } => {
                cli::product::analyze(ctx, &filters.to_filters(), months).await
            }
        },
        Commands::Sales(cmd) => match cmd {
            SalesCommands::History { filters, months } => {
                cli::sales::history(ctx, &filters.to_filters(), months).await
            }
            SalesCommands::Aggregate { filters } => {
                cli::sales::aggregate(ctx, &filters.to_filters()).await
            }
        },
        Commands::Stock(cmd) => match cmd {
            StockCommands::Current { filters } => {
                cli::stock::current(ctx, &filters.to_filters()).await
            }
            StockCommands::History { filters, months } => {
                cli::stock::history(ctx, &filters.to_filters(), months).await
            }
        },
        Commands::Purchase(PurchaseCommands::Price { filters }) => {
            cli::purchase::price(ctx, &filters.to_filters()).await
        }
        Commands::Optimization(cmd) => match cmd {
            OptimizationCommands::Analysis {
                filters,
                group,
                quality,
                by_quality,
                refs,
            } => {
                let view = cli::optimization::AnalysisView {
                    group,
                    quality,
                    by_quality,
                    refs,
                };
                cli::optimization::analysis(ctx, &filters.to_filters(), &view).await
            }
            OptimizationCommands::Simulate {
                filters,
                group,
                quality,
            } => {
                cli::optimization::simulate(ctx, &filters.to_filters(), group, quality.as_deref())
                    .await
            }
        },
        Commands::Suggest(cmd) => match cmd {
            SuggestCommands::Refint { query, watch } => {
                cli::suggest::run(ctx, SuggestKind::Refint, query.as_deref(), watch).await
            }
            SuggestCommands::Refcrn { query, watch } => {
                cli::suggest::run(ctx, SuggestKind::RefCrn, query.as_deref(), watch).await
            }
            SuggestCommands::Refext { query, watch } => {
                cli::suggest::run(ctx, SuggestKind::RefExt, query.as_deref(), watch).await
            }
            SuggestCommands::RefcrnByCodpro { cod_pro } => {
                cli::suggest::refcrn_by_codpro(ctx, cod_pro).await
            }
        },
        Commands::Identifier(IdentifierCommands::Resolve { filters }) => {
            cli::identifier::resolve(ctx, &filters.to_filters()).await
        }
        Commands::Matrix(cmd) => match cmd {
            MatrixCommands::View { filters, view } => {
                cli::matrix::view(ctx, &filters.to_filters(), &view.to_filter()).await
            }
            MatrixCommands::Cell { cod_pro, reference } => {
                cli::matrix::cell(ctx, cod_pro, &reference).await
            }
        },
        Commands::Init
        | Commands::Status
        | Commands::Version
        | Commands::Routes
        | Commands::Open { .. }
        | Commands::Cache(_)
        | Commands::Completion { .. } => Ok(()),
    }
}
