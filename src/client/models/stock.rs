//! Stock models

use serde::{Deserialize, Serialize};

/// Current stock of one product in one depot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub cod_pro: i64,

    #[serde(default)]
    pub depot: i64,

    #[serde(default)]
    pub stock: f64,

    /// Weighted average cost
    #[serde(default)]
    pub pmp: Option<f64>,
}

/// Stock level over a validity interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockHistoryItem {
    #[serde(default)]
    pub depot: i64,

    pub cod_pro: i64,

    /// Start of validity, `YYYY-MM-DD`
    #[serde(default)]
    pub dat_deb: String,

    /// End of validity, `YYYY-MM-DD`
    #[serde(default)]
    pub dat_fin: String,

    #[serde(default)]
    pub stock: f64,

    #[serde(default)]
    pub pmp: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockList {
    #[serde(default)]
    pub items: Vec<StockItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockHistoryList {
    #[serde(default)]
    pub items: Vec<StockHistoryItem>,
}
