//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod context;
pub mod dashboard;
pub mod identifier;
pub mod init;
pub mod layout;
pub mod matrix;
pub mod navigation;
pub mod optimization;
pub mod page;
pub mod product;
pub mod purchase;
pub mod sales;
pub mod status;
pub mod stock;
pub mod suggest;

pub use args::{FilterArgs, GlobalOptions, MatrixViewArgs, OutputFormat};
pub use context::CommandContext;

use crate::config::RunMode;
use crate::export::ExportFormat;

/// cbmx - terminal client for the CBM product explorer
#[derive(Parser, Debug)]
#[command(name = "cbmx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "CBMX_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// API base URL
    #[arg(long, global = true, env = "CBMX_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Run mode (development, production)
    #[arg(
        long,
        global = true,
        env = "CBMX_MODE",
        default_value = "development",
        hide_env = true,
        hide_possible_values = true
    )]
    pub mode: RunMode,

    /// Override config file location
    #[arg(long, global = true, env = "CBMX_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CBMX_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "CBMX_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Keep cached responses on disk between runs
    #[arg(long, global = true)]
    pub persist_cache: bool,

    /// Also export the page data (csv, xlsx, json)
    #[arg(long, global = true, value_enum)]
    pub export: Option<ExportFormat>,

    /// Directory for exported files (default: current directory)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize cbmx configuration
    Init,

    /// Show configuration and API status
    Status,

    /// Display version information
    Version,

    /// Product dashboard: KPIs, sales, stock and purchase prices
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Product master data and analysis
    #[command(subcommand)]
    Product(ProductCommands),

    /// Sales figures
    #[command(subcommand)]
    Sales(SalesCommands),

    /// Stock levels
    #[command(subcommand)]
    Stock(StockCommands),

    /// Purchase prices
    #[command(subcommand)]
    Purchase(PurchaseCommands),

    /// Range optimization by CRN group
    #[command(subcommand)]
    Optimization(OptimizationCommands),

    /// Reference autocomplete
    #[command(subcommand)]
    Suggest(SuggestCommands),

    /// Identifier resolution
    #[command(subcommand)]
    Identifier(IdentifierCommands),

    /// Product/reference correspondence matrix
    #[command(subcommand)]
    Matrix(MatrixCommands),

    /// Open a page by path, e.g. "/dashboard?cod_pro=123"
    Open {
        /// Page path with optional query string
        path: String,
    },

    /// List navigable pages
    Routes,

    /// Manage local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   cbmx completion bash > /etc/bash_completion.d/cbmx
  zsh:    cbmx completion zsh > \"${fpath[1]}/_cbmx\"
  fish:   cbmx completion fish > ~/.config/fish/completions/cbmx.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Product subcommands
#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products matching the filters
    Details {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one product by code
    Detail {
        /// Product code
        cod_pro: i64,
    },

    /// List manufacturer and external reference matches
    Match {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the reference lists of a CRN group
    Matrix {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Details, sales, stock and prices of the filtered products
    Analyze {
        #[command(flatten)]
        filters: FilterArgs,

        /// Months of sales history
        #[arg(long, short = 'm')]
        months: Option<u32>,
    },
}

/// Sales subcommands
#[derive(Subcommand, Debug)]
pub enum SalesCommands {
    /// Monthly sales history
    History {
        #[command(flatten)]
        filters: FilterArgs,

        /// Months of history (default from config, 12)
        #[arg(long, short = 'm')]
        months: Option<u32>,
    },

    /// Sales totals per product
    Aggregate {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Stock subcommands
#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Current stock per depot
    Current {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Stock history
    History {
        #[command(flatten)]
        filters: FilterArgs,

        /// Months of history (default from config, 12)
        #[arg(long, short = 'm')]
        months: Option<u32>,
    },
}

/// Purchase subcommands
#[derive(Subcommand, Debug)]
pub enum PurchaseCommands {
    /// Purchase price per product
    Price {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Optimization subcommands
#[derive(Subcommand, Debug)]
pub enum OptimizationCommands {
    /// Optimization groups with gains and proposed deletions
    Analysis {
        #[command(flatten)]
        filters: FilterArgs,

        /// Keep groups whose CRN grouping contains this text
        #[arg(long)]
        group: Option<String>,

        /// Keep groups whose quality contains this text
        #[arg(long)]
        quality: Option<String>,

        /// Show totals per quality tier
        #[arg(long)]
        by_quality: bool,

        /// Show the references of one CRN grouping
        #[arg(long, value_name = "GROUPING_CRN")]
        refs: Option<i64>,
    },

    /// Simulate removing the proposed references of one group
    Simulate {
        #[command(flatten)]
        filters: FilterArgs,

        /// CRN grouping of the group to simulate
        #[arg(long = "group", value_name = "GROUPING_CRN")]
        group: i64,

        /// Quality tier of the group (required when the grouping has several)
        #[arg(long = "quality")]
        quality: Option<String>,
    },
}

/// Suggestion subcommands
#[derive(Subcommand, Debug)]
pub enum SuggestCommands {
    /// Internal references with their product code
    Refint {
        /// Text to complete (omit with --watch)
        #[arg(required_unless_present = "watch")]
        query: Option<String>,

        /// Read queries from stdin, one per line, debounced
        #[arg(long)]
        watch: bool,
    },

    /// Manufacturer references
    Refcrn {
        /// Text to complete (omit with --watch)
        #[arg(required_unless_present = "watch")]
        query: Option<String>,

        /// Read queries from stdin, one per line, debounced
        #[arg(long)]
        watch: bool,
    },

    /// External references
    Refext {
        /// Text to complete (omit with --watch)
        #[arg(required_unless_present = "watch")]
        query: Option<String>,

        /// Read queries from stdin, one per line, debounced
        #[arg(long)]
        watch: bool,
    },

    /// Manufacturer references of one product
    RefcrnByCodpro {
        /// Product code
        cod_pro: i64,
    },
}

/// Identifier subcommands
#[derive(Subcommand, Debug)]
pub enum IdentifierCommands {
    /// Product codes matching the filters
    Resolve {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Matrix subcommands
#[derive(Subcommand, Debug)]
pub enum MatrixCommands {
    /// Correspondence matrix with match rate and breakdowns
    View {
        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        view: MatrixViewArgs,
    },

    /// Detail of one cell
    Cell {
        /// Product code (row)
        cod_pro: i64,

        /// Reference (column)
        reference: String,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Clear all cached data
    Clear,

    /// Show cache directory path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dashboard_filters() {
        let cli = Cli::try_parse_from(["cbmx", "dashboard", "--cod-pro", "12", "-q", "OE"]).unwrap();
        match cli.command {
            Commands::Dashboard { filters } => {
                assert_eq!(filters.cod_pro, Some(12));
                assert_eq!(filters.qualite.as_deref(), Some("OE"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_date_filters() {
        let cli = Cli::try_parse_from([
            "cbmx", "sales", "history", "-c", "1", "--from", "2024-01-01", "-m", "6",
        ])
        .unwrap();
        match cli.command {
            Commands::Sales(SalesCommands::History { filters, months }) => {
                assert_eq!(months, Some(6));
                assert!(filters.date_from.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(Cli::try_parse_from(["cbmx", "dashboard", "--from", "01/02/2024"]).is_err());
    }
}
