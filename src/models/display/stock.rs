//! Stock display models

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{StockHistoryItem, StockItem};
use crate::output::formatters::{format_date, format_prix, safe_fixed};

/// Current stock in one depot
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StockDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "DEPOT")]
    pub depot: i64,

    #[tabled(rename = "STOCK")]
    pub stock: String,

    #[tabled(rename = "PMP")]
    pub pmp: String,

    #[tabled(rename = "VALUE")]
    pub valeur: String,
}

impl From<&StockItem> for StockDisplay {
    fn from(s: &StockItem) -> Self {
        Self {
            cod_pro: s.cod_pro,
            depot: s.depot,
            stock: safe_fixed(Some(s.stock), 0),
            pmp: format_prix(s.pmp),
            valeur: format_prix(s.pmp.map(|pmp| pmp * s.stock)),
        }
    }
}

/// Stock level over a validity interval
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StockHistoryDisplay {
    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "DEPOT")]
    pub depot: i64,

    #[tabled(rename = "FROM")]
    pub dat_deb: String,

    #[tabled(rename = "TO")]
    pub dat_fin: String,

    #[tabled(rename = "STOCK")]
    pub stock: String,

    #[tabled(rename = "PMP")]
    pub pmp: String,
}

impl From<&StockHistoryItem> for StockHistoryDisplay {
    fn from(s: &StockHistoryItem) -> Self {
        Self {
            cod_pro: s.cod_pro,
            depot: s.depot,
            dat_deb: format_date(&s.dat_deb),
            dat_fin: format_date(&s.dat_fin),
            stock: safe_fixed(Some(s.stock), 0),
            pmp: format_prix(s.pmp),
        }
    }
}
