//! Autocomplete suggestion models

use serde::{Deserialize, Serialize};

/// Plain list of matching references
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub results: Vec<String>,
}

/// Internal reference with its product code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefintCodproSuggestion {
    #[serde(default)]
    pub refint: String,

    pub cod_pro: i64,
}
