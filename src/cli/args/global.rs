//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::RunMode;
use crate::export::ExportFormat;

/// Global CLI options passed to all command handlers.
///
/// Precedence for most options: CLI flag > environment variable > config
/// file > default. This struct captures the CLI/env layer; config file
/// values are applied in `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,

    /// API base URL override
    pub api_url: Option<String>,

    pub mode: RunMode,

    /// Custom config file path (defaults to ~/.cbmx/config.yaml)
    pub config: Option<String>,

    /// Bypass the response cache
    pub no_cache: bool,

    /// Keep cached responses on disk between runs
    pub persist_cache: bool,

    /// Also write the page data to a file
    pub export: Option<ExportFormat>,

    /// Directory for exported files
    pub output: Option<PathBuf>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            api_url: cli.api_url.clone(),
            mode: cli.mode,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            persist_cache: cli.persist_cache,
            export: cli.export,
            output: cli.output.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_url_ref(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_defaults() {
        let cli = Cli::try_parse_from(["cbmx", "routes"]).unwrap();
        let opts = GlobalOptions::from_cli(&cli);
        assert!(!opts.no_cache);
        assert!(!opts.persist_cache);
        assert_eq!(opts.export, None);
        assert_eq!(opts.config_ref(), None);
    }

    #[test]
    fn test_from_cli_flags() {
        let cli = Cli::try_parse_from([
            "cbmx",
            "--format",
            "json",
            "--api-url",
            "http://api.local",
            "--mode",
            "production",
            "--export",
            "csv",
            "routes",
        ])
        .unwrap();
        let opts = GlobalOptions::from_cli(&cli);
        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.api_url_ref(), Some("http://api.local"));
        assert_eq!(opts.mode, RunMode::Production);
        assert_eq!(opts.export, Some(ExportFormat::Csv));
    }
}
