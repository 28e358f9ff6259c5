//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::{Config, RunMode, UrlSource};
use crate::error::Result;

fn source_label(source: UrlSource) -> &'static str {
    match source {
        UrlSource::Override => "(via --api-url / CBMX_API_URL)",
        UrlSource::ConfigFile => "(from config file)",
        UrlSource::Fallback => "(development fallback)",
    }
}

fn mode_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Development => "development",
        RunMode::Production => "production",
    }
}

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "cbmx Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(_) => {
            println!("{} Configuration not found", "○".dimmed());
            println!("  → Run {} to create one", "cbmx init".cyan());
            Config::default()
        }
    };
    println!("Mode: {}", mode_label(opts.mode).bold());
    println!();

    match config.resolve_api_url(opts.api_url_ref(), opts.mode) {
        Ok((url, UrlSource::Fallback)) => {
            println!(
                "{} API URL: {} {}",
                "⚠".yellow(),
                url.cyan(),
                source_label(UrlSource::Fallback).dimmed()
            );
            println!("  → Set CBMX_API_URL or run 'cbmx init' to configure");
        }
        Ok((url, source)) => {
            println!(
                "{} API URL: {} {}",
                "✓".green(),
                url.cyan(),
                source_label(source).dimmed()
            );
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
        }
    }

    let prefs = &config.preferences;
    println!(
        "{} Cache TTL: {}s, debounce: {}ms, history: {} months",
        "○".dimmed(),
        prefs.cache_ttl_secs,
        prefs.debounce_ms,
        prefs.history_months
    );
    println!(
        "{} Rate limit: {}/s, timeout: {}s, CSV separator: '{}'",
        "○".dimmed(),
        prefs.rate_limit_per_second,
        prefs.timeout_secs,
        prefs.csv_separator
    );

    if opts.persist_cache && !opts.no_cache {
        println!("{} Persistent cache enabled", "✓".green());
    } else if opts.no_cache {
        println!("{} Cache disabled (--no-cache)", "○".dimmed());
    } else {
        println!("{} In-memory cache only", "○".dimmed());
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels_distinct() {
        assert_ne!(
            source_label(UrlSource::Override),
            source_label(UrlSource::ConfigFile)
        );
        assert!(source_label(UrlSource::Fallback).contains("fallback"));
    }

    #[test]
    fn test_mode_label() {
        assert_eq!(mode_label(RunMode::Production), "production");
    }
}
