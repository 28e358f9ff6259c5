//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::config::{Config, DEV_FALLBACK_API_URL, RunMode};
use crate::error::Result;

const SEPARATORS: [(char, &str); 3] = [(';', "; (semicolon)"), (',', ", (comma)"), ('\t', "tab")];

/// Run the init command
///
/// Existing values are offered as defaults, so re-running init edits the
/// current configuration instead of starting over.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to cbmx!".bold().green());
    println!("Let's set up access to the product explorer API.\n");

    let mut config = Config::load_or_default(opts.config_ref())?;
    let theme = ColorfulTheme::default();

    let current_url = opts
        .api_url
        .clone()
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEV_FALLBACK_API_URL.to_string());

    let api_url: String = Input::with_theme(&theme)
        .with_prompt("API base URL")
        .default(current_url)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            Config::default()
                .resolve_api_url(Some(input), RunMode::Production)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    // Stored normalized, without trailing slash
    let (api_url, _) = config.resolve_api_url(Some(&api_url), RunMode::Production)?;
    config.api_url = Some(api_url);

    let customize = Confirm::with_theme(&theme)
        .with_prompt("Customize cache, history and export preferences?")
        .default(false)
        .interact()?;

    if customize {
        let prefs = &mut config.preferences;

        prefs.cache_ttl_secs = Input::with_theme(&theme)
            .with_prompt("Cache lifetime (seconds)")
            .default(prefs.cache_ttl_secs)
            .interact_text()?;

        prefs.history_months = Input::with_theme(&theme)
            .with_prompt("Months of sales/stock history")
            .default(prefs.history_months)
            .validate_with(|m: &u32| -> std::result::Result<(), &str> {
                if *m == 0 {
                    Err("must be at least 1")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        prefs.debounce_ms = Input::with_theme(&theme)
            .with_prompt("Search debounce delay (ms)")
            .default(prefs.debounce_ms)
            .interact_text()?;

        let labels: Vec<&str> = SEPARATORS.iter().map(|(_, label)| *label).collect();
        let current = SEPARATORS
            .iter()
            .position(|(sep, _)| *sep == prefs.csv_separator)
            .unwrap_or(0);
        let selection = Select::with_theme(&theme)
            .with_prompt("CSV separator")
            .items(&labels)
            .default(current)
            .interact_opt()?;
        if let Some((sep, _)) = selection.and_then(|idx| SEPARATORS.get(idx)) {
            prefs.csv_separator = *sep;
        }
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );
    if let Some(url) = &config.api_url {
        println!("  API URL: {}", url.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "cbmx status".cyan());
    println!("  {} - Open a product dashboard", "cbmx dashboard -c <COD_PRO>".cyan());

    Ok(())
}
