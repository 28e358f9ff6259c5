//! Shared page layout: header banner, filter summary, sections, loading
//! spinner, empty and error states.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::models::ProductFilters;
use crate::error::{ApiError, Error};

const APP_TITLE: &str = "CBM Product Explorer";
const RULE: &str = "────────────────────────────────────────";

/// Page header with the active filters
pub fn header(title: &str, filters: Option<&ProductFilters>) {
    println!("{} {} {}", APP_TITLE.bold(), "›".dimmed(), title.bold().cyan());
    if let Some(filters) = filters {
        println!("{} {}", "Filters:".dimmed(), filters.summary());
    }
    println!("{}", RULE.dimmed());
}

/// Section title inside a page
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Note under a section, e.g. the data source
pub fn note(text: &str) {
    println!("{}", text.dimmed());
}

/// Shown instead of data when no filter is active
pub fn empty_state(hint: &str) {
    println!("{}", "No product selected".bold());
    println!("  → {}", hint);
}

/// Shown when a page has nothing to display
pub fn no_data() {
    println!("{}", "No data available for these filters.".dimmed());
}

/// Error block for a failed page load, on stderr
pub fn error_block(err: &ApiError) {
    eprintln!("{} {}", "✗".red(), "Error loading data".red().bold());
    eprintln!("  {}", err.ui_message());
    if let Some(status) = err.status() {
        eprintln!("  {}", format!("HTTP {}: {}", status, err).dimmed());
    } else {
        eprintln!("  {}", err.to_string().dimmed());
    }
    eprintln!("  → Re-run with {} to retry against the API", "--no-cache".cyan());
}

/// Print a top-level error the way pages expect it
pub fn report_error(err: &Error) {
    match err {
        Error::Api(api) => error_block(api),
        other => eprintln!("{} {}", "Error:".red().bold(), other),
    }
}

/// Warning line that does not fail the page
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Loading spinner; a hidden bar when decoration is off
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
