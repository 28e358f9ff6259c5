//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: String,
    pub version: String,

    /// Active filter summary, when the page has filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,

    /// Whether the payload came from the cache
    #[serde(default)]
    pub cached: bool,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                filters: None,
                cached: false,
            },
        }
    }

    pub fn with_filters(mut self, summary: String) -> Self {
        self.meta.filters = Some(summary);
        self
    }

    pub fn cached(mut self, cached: bool) -> Self {
        self.meta.cached = cached;
        self
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Row {
        cod_pro: i64,
    }

    #[test]
    fn test_json_output_new() {
        let output = JsonOutput::new(vec![1, 2]);
        assert_eq!(output.data, vec![1, 2]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(!output.meta.cached);
        assert!(output.meta.filters.is_none());
    }

    #[test]
    fn test_format_json_envelope() {
        let result = format_json(&vec![Row { cod_pro: 7 }]).unwrap();
        assert!(result.contains("\"data\""));
        assert!(result.contains("\"cod_pro\": 7"));
        assert!(result.contains("\"timestamp\""));
        assert!(!result.contains("\"filters\""));
    }

    #[test]
    fn test_filters_and_cached_in_meta() {
        let output = JsonOutput::new(()).with_filters("cod_pro=1".into()).cached(true);
        let text = serde_json::to_string(&output).unwrap();
        assert!(text.contains("\"filters\":\"cod_pro=1\""));
        assert!(text.contains("\"cached\":true"));
    }
}
