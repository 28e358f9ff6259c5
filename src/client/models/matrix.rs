//! Matrix view models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductDetail;

/// Column of the matrix: one reference and where it comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixColumnRef {
    #[serde(rename = "ref")]
    pub reference: String,

    /// `crn_only`, `ext_only` or `both`
    #[serde(rename = "type", default)]
    pub column_type: String,

    #[serde(default)]
    pub color_code: String,
}

/// A filled cell: product `cod_pro` matches a reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub cod_pro: i64,

    #[serde(default)]
    pub ref_crn: Option<String>,

    #[serde(default)]
    pub ref_ext: Option<String>,
}

impl Correspondence {
    /// Whether this correspondence fills the column for `reference`
    pub fn covers(&self, reference: &str) -> bool {
        self.ref_crn.as_deref() == Some(reference) || self.ref_ext.as_deref() == Some(reference)
    }
}

/// `POST /matrix/view` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixView {
    #[serde(default)]
    pub products: Vec<ProductDetail>,

    #[serde(default)]
    pub column_refs: Vec<MatrixColumnRef>,

    #[serde(default)]
    pub correspondences: Vec<Correspondence>,

    #[serde(default)]
    pub total_products: i64,

    #[serde(default)]
    pub total_columns: i64,

    #[serde(default)]
    pub total_correspondences: i64,

    #[serde(default)]
    pub column_type_stats: Map<String, Value>,

    #[serde(default)]
    pub quality_stats: Map<String, Value>,
}

/// Extra criteria accepted by `POST /matrix/view/filtered`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixViewFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualite: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub famille: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<i64>,

    /// Free-text search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl MatrixViewFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `GET /matrix/cell/{cod_pro}/{ref}` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixCell {
    pub cod_pro: i64,

    #[serde(rename = "ref", default)]
    pub reference: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_ref_field_names() {
        let col: MatrixColumnRef = serde_json::from_value(json!({
            "ref": "ABC-1",
            "type": "both",
            "color_code": "#00ff00"
        }))
        .unwrap();
        assert_eq!(col.reference, "ABC-1");
        assert_eq!(col.column_type, "both");
    }

    #[test]
    fn test_correspondence_covers() {
        let c = Correspondence {
            cod_pro: 1,
            ref_crn: Some("X".into()),
            ref_ext: None,
        };
        assert!(c.covers("X"));
        assert!(!c.covers("Y"));
    }

    #[test]
    fn test_filter_serializes_only_set_fields() {
        let f = MatrixViewFilter {
            search_term: Some("filtre".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&f).unwrap(), json!({"search_term": "filtre"}));
        assert!(MatrixViewFilter::default().is_empty());
    }
}
