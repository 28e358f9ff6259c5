//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - page layout with headers, KPIs and colors
    #[default]
    Pretty,
    /// Table format - one table per page, no decoration
    Table,
    /// JSON format - structured for scripts
    Json,
}

impl OutputFormat {
    /// Whether page decoration (headers, spinners, colors) is shown
    pub fn is_pretty(&self) -> bool {
        matches!(self, OutputFormat::Pretty)
    }
}
