//! Reusable formatting utilities for CLI output
//!
//! Numbers follow French conventions: narrow no-break space between
//! thousands, comma before decimals.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Thousands separator used by French number formatting
pub const THOUSANDS_SEP: char = '\u{202F}';

/// Interpret a JSON value as a number: numbers as-is, strings by their
/// longest leading decimal literal (`"12,5"` and `"12abc"` both give 12),
/// anything else `None`.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => float_prefix(s.trim_start()).parse::<f64>().ok(),
        _ => None,
    }
}

/// `[sign] digits [. digits] [exponent]` at the start of `s`, or `""`
fn float_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int = digits(end);
    end += int;

    let mut frac = 0;
    if bytes.get(end) == Some(&b'.') {
        frac = digits(end + 1);
        if int > 0 || frac > 0 {
            end += 1 + frac;
        }
    }
    if int == 0 && frac == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(exp);
        if n > 0 {
            end = exp + n;
        }
    }
    &s[..end]
}

/// Group digits French-style with a fixed number of decimals.
///
/// `NaN` and infinities are the caller's problem; every public formatter
/// filters them first.
fn group_fr(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEP);
        }
        grouped.push(ch);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{},{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Price with two decimals and a euro suffix.
///
/// Missing, zero or non-numeric values render as `-`.
pub fn format_prix(value: Option<f64>) -> String {
    match usable(value) {
        Some(v) if v != 0.0 => format!("{} €", group_fr(v, 2)),
        _ => "-".to_string(),
    }
}

/// Percentage with one decimal and a ` %` suffix; zero renders as `-`.
pub fn format_pourcentage(value: Option<f64>) -> String {
    match usable(value) {
        Some(v) if v != 0.0 => format!("{} %", group_fr(v, 1)),
        _ => "-".to_string(),
    }
}

/// Fixed decimals; a missing value counts as zero, NaN renders as `-`.
pub fn safe_fixed(value: Option<f64>, decimals: usize) -> String {
    match usable(Some(value.unwrap_or(0.0))) {
        Some(v) => group_fr(v, decimals),
        None => "-".to_string(),
    }
}

/// Grouped number, `N/A` when missing
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match usable(value) {
        Some(v) => group_fr(v, decimals),
        None => "N/A".to_string(),
    }
}

/// Euro amount. With `compact`, amounts of a thousand or more are
/// abbreviated to `K €` / `M €`.
pub fn format_currency(value: Option<f64>, compact: bool) -> String {
    let Some(v) = usable(value) else {
        return "N/A".to_string();
    };

    if compact {
        if v.abs() >= 1_000_000.0 {
            return format!("{:.1}M €", v / 1_000_000.0);
        }
        if v.abs() >= 1_000.0 {
            return format!("{:.1}K €", v / 1_000.0);
        }
    }

    format!("{}\u{a0}€", group_fr(v, 2))
}

/// Percentage with `decimals`; `is_ratio` multiplies by 100 first.
pub fn format_percentage(value: Option<f64>, decimals: usize, is_ratio: bool) -> String {
    match usable(value) {
        Some(v) => {
            let pct = if is_ratio { v * 100.0 } else { v };
            format!("{}%", group_fr(pct, decimals))
        }
        None => "N/A".to_string(),
    }
}

/// Cut `text` to `max_len` characters and append `...` if it was longer
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{}...", cut)
}

/// Whole-number quantity with an optional unit
pub fn format_quantity(value: Option<f64>, unit: &str) -> String {
    match usable(value) {
        Some(v) => format!("{} {}", group_fr(v, 0), unit).trim_end().to_string(),
        None => "N/A".to_string(),
    }
}

/// `DD/MM/YYYY` from an ISO date or date-time, `N/A` when unparseable
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "N/A".to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%d/%m/%Y").to_string();
    }
    "N/A".to_string()
}

/// Local date/time for a Unix timestamp (seconds)
pub fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Display an optional string, `-` when missing or blank
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NNBSP: &str = "\u{202F}";

    #[test]
    fn test_format_prix_valid() {
        assert_eq!(format_prix(Some(1234.5)), format!("1{}234,50 €", NNBSP));
        assert_eq!(format_prix(Some(9.999)), "10,00 €");
        assert_eq!(format_prix(Some(-12.3)), "-12,30 €");
    }

    #[test]
    fn test_format_prix_empty_values() {
        assert_eq!(format_prix(None), "-");
        assert_eq!(format_prix(Some(0.0)), "-");
        assert_eq!(format_prix(Some(f64::NAN)), "-");
        assert_eq!(format_prix(numeric(&json!("abc"))), "-");
        assert_eq!(format_prix(numeric(&json!(null))), "-");
    }

    #[test]
    fn test_format_prix_numeric_string() {
        assert_eq!(format_prix(numeric(&json!("12.5"))), "12,50 €");
    }

    #[test]
    fn test_numeric_reads_leading_literal() {
        assert_eq!(numeric(&json!("12,5")), Some(12.0));
        assert_eq!(numeric(&json!("12abc")), Some(12.0));
        assert_eq!(numeric(&json!("  -3.5e2x")), Some(-350.0));
        assert_eq!(numeric(&json!(".5")), Some(0.5));
        assert_eq!(numeric(&json!("7e")), Some(7.0));
        assert_eq!(numeric(&json!("abc")), None);
        assert_eq!(numeric(&json!("-")), None);
        assert_eq!(numeric(&json!(true)), None);
    }

    #[test]
    fn test_format_pourcentage() {
        assert_eq!(format_pourcentage(Some(45.67)), "45,7 %");
        assert_eq!(format_pourcentage(Some(0.0)), "-");
        assert_eq!(format_pourcentage(None), "-");
        assert_eq!(format_pourcentage(Some(f64::NAN)), "-");
    }

    #[test]
    fn test_safe_fixed() {
        assert_eq!(safe_fixed(None, 2), "0,00");
        assert_eq!(safe_fixed(Some(0.0), 2), "0,00");
        assert_eq!(safe_fixed(Some(1234567.891), 1), format!("1{0}234{0}567,9", NNBSP));
        assert_eq!(safe_fixed(Some(f64::NAN), 2), "-");
        assert_eq!(safe_fixed(Some(3.0), 0), "3");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(safe_fixed(Some(-0.001), 2), "0,00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(1000.0), 0), format!("1{}000", NNBSP));
        assert_eq!(format_number(Some(999.0), 0), "999");
        assert_eq!(format_number(None, 0), "N/A");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(1500.0), true), "1.5K €");
        assert_eq!(format_currency(Some(2_500_000.0), true), "2.5M €");
        assert_eq!(format_currency(Some(999.0), true), "999,00\u{a0}€");
        assert_eq!(format_currency(None, false), "N/A");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(Some(0.256), 1, true), "25,6%");
        assert_eq!(format_percentage(Some(12.0), 1, false), "12,0%");
        assert_eq!(format_percentage(None, 1, false), "N/A");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefgh", 3), "abc...");
        assert_eq!(truncate_text("éèàç", 2), "éè...");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(Some(12.0), "pcs"), "12 pcs");
        assert_eq!(format_quantity(Some(12.0), ""), "12");
        assert_eq!(format_quantity(None, "pcs"), "N/A");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05"), "05/03/2024");
        assert_eq!(format_date("2024-03-05T10:00:00"), "05/03/2024");
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("garbage"), "N/A");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("x")), "x");
        assert_eq!(or_dash(Some(" ")), "-");
        assert_eq!(or_dash(None), "-");
    }
}
