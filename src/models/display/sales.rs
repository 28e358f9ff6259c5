//! Sales display models

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{SalesAggregate, SalesHistory};
use crate::output::formatters::{format_prix, format_pourcentage, or_dash, safe_fixed};
use crate::transform::dashboard::{MonthlyTotal, QualityRevenue};

/// Sales totals of one product
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SalesAggregateDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "REVENUE")]
    pub ca_total: String,

    #[tabled(rename = "MARGIN")]
    pub marge_total: String,

    #[tabled(rename = "QTY")]
    pub quantite_total: String,

    #[tabled(rename = "MARGIN %")]
    pub marge_percent_total: String,
}

impl From<&SalesAggregate> for SalesAggregateDisplay {
    fn from(s: &SalesAggregate) -> Self {
        Self {
            cod_pro: s.cod_pro,
            refint: or_dash(s.refint.as_deref()),
            ca_total: format_prix(Some(s.ca_total)),
            marge_total: format_prix(Some(s.marge_total)),
            quantite_total: safe_fixed(Some(s.quantite_total), 0),
            marge_percent_total: format_pourcentage(Some(s.marge_percent_total)),
        }
    }
}

/// One month of sales for one product
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SalesHistoryDisplay {
    #[tabled(rename = "PERIOD")]
    pub periode: String,

    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REVENUE")]
    pub ca: String,

    #[tabled(rename = "MARGIN")]
    pub marge: String,

    #[tabled(rename = "QTY")]
    pub quantite: String,

    #[tabled(rename = "MARGIN %")]
    pub marge_percent: String,
}

impl From<&SalesHistory> for SalesHistoryDisplay {
    fn from(s: &SalesHistory) -> Self {
        Self {
            periode: or_dash(Some(&s.periode)),
            cod_pro: s.cod_pro,
            ca: format_prix(Some(s.ca)),
            marge: format_prix(Some(s.marge)),
            quantite: safe_fixed(Some(s.quantite), 0),
            marge_percent: format_pourcentage(Some(s.marge_percent)),
        }
    }
}

/// Sales of one month across products
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MonthlyTotalDisplay {
    #[tabled(rename = "PERIOD")]
    pub periode: String,

    #[tabled(rename = "REVENUE")]
    pub ca: String,

    #[tabled(rename = "MARGIN")]
    pub marge: String,

    #[tabled(rename = "QTY")]
    pub quantite: String,
}

impl From<&MonthlyTotal> for MonthlyTotalDisplay {
    fn from(m: &MonthlyTotal) -> Self {
        Self {
            periode: or_dash(Some(&m.periode)),
            ca: format_prix(Some(m.ca)),
            marge: format_prix(Some(m.marge)),
            quantite: safe_fixed(Some(m.quantite), 0),
        }
    }
}

/// Revenue of one quality tier
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct QualityRevenueDisplay {
    #[tabled(rename = "QUALITY")]
    pub qualite: String,

    #[tabled(rename = "PRODUCTS")]
    pub products: usize,

    #[tabled(rename = "REVENUE")]
    pub ca_total: String,
}

impl From<&QualityRevenue> for QualityRevenueDisplay {
    fn from(q: &QualityRevenue) -> Self {
        Self {
            qualite: q.qualite.clone(),
            products: q.products,
            ca_total: format_prix(Some(q.ca_total)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_display() {
        let row = SalesAggregateDisplay::from(&SalesAggregate {
            cod_pro: 1,
            ca_total: 100.0,
            quantite_total: 12.0,
            marge_percent_total: 25.55,
            ..Default::default()
        });
        assert_eq!(row.ca_total, "100,00 €");
        assert_eq!(row.marge_total, "-");
        assert_eq!(row.quantite_total, "12");
        assert_eq!(row.marge_percent_total, "25,6 %");
    }

    #[test]
    fn test_history_display_blank_period() {
        let row = SalesHistoryDisplay::from(&SalesHistory {
            cod_pro: 1,
            ..Default::default()
        });
        assert_eq!(row.periode, "-");
    }
}
