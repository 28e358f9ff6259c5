//! Suggestion display models

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::RefintCodproSuggestion;

/// Internal reference suggestion
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SuggestionDisplay {
    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,
}

impl From<&RefintCodproSuggestion> for SuggestionDisplay {
    fn from(s: &RefintCodproSuggestion) -> Self {
        Self {
            refint: s.refint.clone(),
            cod_pro: s.cod_pro,
        }
    }
}

/// Plain reference suggestion
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ReferenceDisplay {
    #[tabled(rename = "REFERENCE")]
    pub reference: String,
}

impl From<&String> for ReferenceDisplay {
    fn from(reference: &String) -> Self {
        Self {
            reference: reference.clone(),
        }
    }
}
