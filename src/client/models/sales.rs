//! Sales models

use serde::{Deserialize, Serialize};

/// Sales totals of one product over the selected period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesAggregate {
    pub cod_pro: i64,

    #[serde(default)]
    pub refint: Option<String>,

    /// Revenue
    #[serde(default)]
    pub ca_total: f64,

    #[serde(default)]
    pub marge_total: f64,

    #[serde(default)]
    pub quantite_total: f64,

    #[serde(default)]
    pub marge_percent_total: f64,
}

/// One month of sales for one product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesHistory {
    pub cod_pro: i64,

    #[serde(default)]
    pub refint: Option<String>,

    /// Month, `YYYY-MM`
    #[serde(default)]
    pub periode: String,

    #[serde(default)]
    pub ca: f64,

    #[serde(default)]
    pub marge: f64,

    #[serde(default)]
    pub quantite: f64,

    #[serde(default)]
    pub marge_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesAggregateList {
    #[serde(default)]
    pub items: Vec<SalesAggregate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesHistoryList {
    #[serde(default)]
    pub items: Vec<SalesHistory>,
}
