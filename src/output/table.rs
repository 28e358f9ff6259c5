//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Message shown in place of an empty table
pub const EMPTY_MESSAGE: &str = "No results found.";

/// Format rows as a rounded table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Two-column label/value table, e.g. for KPIs
pub fn format_pairs(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut builder = tabled::builder::Builder::default();
    for (label, value) in pairs {
        builder.push_record([label.to_string(), value.clone()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
