//! Matrix display models

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{Correspondence, MatrixColumnRef, MatrixView};
use crate::output::formatters::or_dash;

/// One filled cell of the matrix
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CorrespondenceDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "REF_CRN")]
    pub ref_crn: String,

    #[tabled(rename = "REF_EXT")]
    pub ref_ext: String,
}

impl CorrespondenceDisplay {
    /// Rows for every correspondence, with the product's internal reference
    pub fn for_view(view: &MatrixView) -> Vec<Self> {
        view.correspondences
            .iter()
            .map(|c| {
                let refint = view
                    .products
                    .iter()
                    .find(|p| p.cod_pro == c.cod_pro)
                    .and_then(|p| p.refint.as_deref());
                Self::new(c, refint)
            })
            .collect()
    }

    fn new(c: &Correspondence, refint: Option<&str>) -> Self {
        Self {
            cod_pro: c.cod_pro,
            refint: or_dash(refint),
            ref_crn: or_dash(c.ref_crn.as_deref()),
            ref_ext: or_dash(c.ref_ext.as_deref()),
        }
    }
}

/// One column of the matrix with its fill count
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MatrixColumnDisplay {
    #[tabled(rename = "REFERENCE")]
    pub reference: String,

    #[tabled(rename = "TYPE")]
    pub column_type: String,

    #[tabled(rename = "PRODUCTS")]
    pub matched: usize,
}

impl MatrixColumnDisplay {
    pub fn for_view(view: &MatrixView) -> Vec<Self> {
        view.column_refs
            .iter()
            .map(|col| Self::new(col, &view.correspondences))
            .collect()
    }

    fn new(col: &MatrixColumnRef, correspondences: &[Correspondence]) -> Self {
        Self {
            reference: col.reference.clone(),
            column_type: or_dash(Some(&col.column_type)),
            matched: correspondences
                .iter()
                .filter(|c| c.covers(&col.reference))
                .count(),
        }
    }
}
