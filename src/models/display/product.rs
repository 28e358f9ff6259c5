//! Product display models

use serde::Serialize;
use tabled::Tabled;

use crate::classify::{Level, margin_level, status_label};
use crate::client::models::{ProductDetail, ProductMatch, PurchasePrice};
use crate::output::formatters::{
    format_number, format_pourcentage, format_prix, format_quantity, or_dash, truncate_text,
};
use crate::transform::EnrichedProduct;

/// Margin with its level, e.g. `33,3 % (High)`
fn margin_cell(value: f64, qualite: Option<&str>) -> String {
    let text = format_pourcentage(Some(value));
    match margin_level(Some(value), qualite) {
        Level::Unknown => text,
        level if text == "-" => format!("- ({:?})", level),
        level => format!("{} ({:?})", text, level),
    }
}

/// Longer supplier names are cut in tables
const SUPPLIER_WIDTH: usize = 30;

fn optional_code(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Product master data row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProductDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "REF_EXT")]
    pub ref_ext: String,

    #[tabled(rename = "QUALITY")]
    pub qualite: String,

    #[tabled(rename = "FAMILY")]
    pub famille: String,

    #[tabled(rename = "STATUS")]
    pub statut: String,

    #[tabled(rename = "SUPPLIER")]
    pub fournisseur: String,
}

impl From<&ProductDetail> for ProductDisplay {
    fn from(p: &ProductDetail) -> Self {
        let famille = match (p.famille, p.s_famille) {
            (Some(f), Some(s)) => format!("{}/{}", f, s),
            (Some(f), None) => f.to_string(),
            _ => "-".to_string(),
        };
        let fournisseur = match (&p.nom_fou, p.cod_fou_principal) {
            (Some(nom), _) if !nom.trim().is_empty() => truncate_text(nom.trim(), SUPPLIER_WIDTH),
            (_, Some(code)) => code.to_string(),
            _ => "-".to_string(),
        };

        Self {
            cod_pro: p.cod_pro,
            refint: or_dash(p.refint.as_deref()),
            ref_ext: or_dash(p.ref_ext.as_deref()),
            qualite: or_dash(p.qualite.as_deref()),
            famille,
            statut: status_label(p.statut),
            fournisseur,
        }
    }
}

/// Dashboard row: a product with its sales, stock and prices
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EnrichedProductDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "QUALITY")]
    pub qualite: String,

    #[tabled(rename = "STATUS")]
    pub statut: String,

    #[tabled(rename = "REVENUE")]
    pub ca_total: String,

    #[tabled(rename = "QTY")]
    pub quantite_total: String,

    #[tabled(rename = "MARGIN")]
    pub marge: String,

    #[tabled(rename = "STOCK")]
    pub stock_total: String,

    #[tabled(rename = "PURCHASE")]
    pub px_achat: String,

    #[tabled(rename = "PMP")]
    pub pmp: String,
}

impl From<&EnrichedProduct> for EnrichedProductDisplay {
    fn from(p: &EnrichedProduct) -> Self {
        let qualite = p.detail.qualite.as_deref();
        Self {
            cod_pro: p.detail.cod_pro,
            refint: or_dash(p.detail.refint.as_deref()),
            qualite: or_dash(qualite),
            statut: status_label(p.detail.statut),
            ca_total: format_prix(Some(p.ca_total)),
            quantite_total: format_quantity(Some(p.quantite_total), ""),
            marge: margin_cell(p.marge_percent_total, qualite),
            stock_total: format_number(Some(p.stock_total), 0),
            px_achat: format_prix(Some(p.px_achat_eur)),
            pmp: format_prix(Some(p.pmp)),
        }
    }
}

/// Reference correspondence row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MatchDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REF_CRN")]
    pub ref_crn: String,

    #[tabled(rename = "REF_EXT")]
    pub ref_ext: String,
}

impl From<&ProductMatch> for MatchDisplay {
    fn from(m: &ProductMatch) -> Self {
        Self {
            cod_pro: m.cod_pro,
            ref_crn: or_dash(m.ref_crn.as_deref()),
            ref_ext: or_dash(m.ref_ext.as_deref()),
        }
    }
}

/// Purchase price row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PurchasePriceDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "PURCHASE PRICE")]
    pub px_achat: String,
}

impl From<&PurchasePrice> for PurchasePriceDisplay {
    fn from(p: &PurchasePrice) -> Self {
        Self {
            cod_pro: p.cod_pro,
            px_achat: format_prix(p.px_achat_eur),
        }
    }
}

/// Status and family codes as shown in detail views
pub fn codes_summary(p: &ProductDetail) -> String {
    format!(
        "family {} / sub-family {} / status {}",
        optional_code(p.famille),
        optional_code(p.s_famille),
        status_label(p.statut)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> ProductDetail {
        ProductDetail {
            cod_pro: 42,
            refint: Some("AB-42".into()),
            qualite: Some("OEM".into()),
            famille: Some(3),
            s_famille: Some(7),
            statut: Some(1),
            nom_fou: Some("ACME".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_display_from_detail() {
        let row = ProductDisplay::from(&detail());
        assert_eq!(row.cod_pro, 42);
        assert_eq!(row.refint, "AB-42");
        assert_eq!(row.ref_ext, "-");
        assert_eq!(row.famille, "3/7");
        assert_eq!(row.statut, "Purchase forbidden");
        assert_eq!(row.fournisseur, "ACME");
    }

    #[test]
    fn test_enriched_display_margin_level() {
        let product = EnrichedProduct {
            detail: detail(),
            ca_total: 1234.5,
            marge_percent_total: 40.0,
            ..Default::default()
        };
        let row = EnrichedProductDisplay::from(&product);
        assert_eq!(row.ca_total, "1\u{202F}234,50 €");
        assert_eq!(row.marge, "40,0 % (High)");
        assert_eq!(row.px_achat, "-");
        assert_eq!(row.quantite_total, "0");
    }

    #[test]
    fn test_long_supplier_name_is_cut() {
        let p = ProductDetail {
            nom_fou: Some("Compagnie Générale des Pièces Détachées".into()),
            ..detail()
        };
        let row = ProductDisplay::from(&p);
        assert!(row.fournisseur.ends_with("..."));
        assert_eq!(row.fournisseur.chars().count(), SUPPLIER_WIDTH + 3);
    }

    #[test]
    fn test_margin_cell_zero_is_dash_with_level() {
        assert_eq!(margin_cell(0.0, Some("OE")), "- (Low)");
        assert_eq!(margin_cell(10.0, None), "10,0 %");
    }

    #[test]
    fn test_codes_summary() {
        assert_eq!(
            codes_summary(&detail()),
            "family 3 / sub-family 7 / status Purchase forbidden"
        );
    }
}
