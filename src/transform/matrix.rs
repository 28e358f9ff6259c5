//! Matrix summary report

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::models::MatrixView;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixSummary {
    pub total_products: usize,
    pub total_columns: usize,
    pub total_correspondences: usize,
    /// Filled cells over all cells, 0-100
    pub match_rate: f64,
    /// Products per quality tier
    pub by_quality: BTreeMap<String, usize>,
    /// Columns per column type (`crn_only`, `ext_only`, `both`)
    pub by_column_type: BTreeMap<String, usize>,
}

pub fn summary(view: &MatrixView) -> MatrixSummary {
    let products = view.products.len();
    let columns = view.column_refs.len();
    let correspondences = view.correspondences.len();

    let match_rate = if products > 0 && columns > 0 {
        correspondences as f64 / (products * columns) as f64 * 100.0
    } else {
        0.0
    };

    let mut by_quality = BTreeMap::new();
    for p in &view.products {
        let tier = p.qualite.clone().unwrap_or_else(|| "N/A".to_string());
        *by_quality.entry(tier).or_insert(0) += 1;
    }

    let mut by_column_type = BTreeMap::new();
    for c in &view.column_refs {
        *by_column_type.entry(c.column_type.clone()).or_insert(0) += 1;
    }

    MatrixSummary {
        total_products: products,
        total_columns: columns,
        total_correspondences: correspondences,
        match_rate,
        by_quality,
        by_column_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{Correspondence, MatrixColumnRef, ProductDetail};

    fn view() -> MatrixView {
        MatrixView {
            products: vec![
                ProductDetail {
                    cod_pro: 1,
                    qualite: Some("OEM".into()),
                    ..Default::default()
                },
                ProductDetail {
                    cod_pro: 2,
                    qualite: Some("OEM".into()),
                    ..Default::default()
                },
            ],
            column_refs: vec![
                MatrixColumnRef {
                    reference: "A".into(),
                    column_type: "both".into(),
                    color_code: String::new(),
                },
                MatrixColumnRef {
                    reference: "B".into(),
                    column_type: "crn_only".into(),
                    color_code: String::new(),
                },
            ],
            correspondences: vec![Correspondence {
                cod_pro: 1,
                ref_crn: Some("A".into()),
                ref_ext: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_match_rate() {
        let s = summary(&view());
        assert_eq!(s.match_rate, 25.0);
        assert_eq!(s.total_correspondences, 1);
    }

    #[test]
    fn test_breakdowns() {
        let s = summary(&view());
        assert_eq!(s.by_quality["OEM"], 2);
        assert_eq!(s.by_column_type["both"], 1);
        assert_eq!(s.by_column_type["crn_only"], 1);
    }

    #[test]
    fn test_empty_matrix_rate_is_zero() {
        assert_eq!(summary(&MatrixView::default()).match_rate, 0.0);
    }
}
