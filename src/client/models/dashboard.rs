//! Dashboard models

use serde::{Deserialize, Serialize};

use super::{ProductDetail, ProductMatch, PurchasePrice, SalesAggregate, SalesHistory, StockItem};

/// `POST /dashboard/fiche` response: everything the product sheet shows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFiche {
    #[serde(default)]
    pub details: Vec<ProductDetail>,

    #[serde(default)]
    pub sales: Vec<SalesAggregate>,

    #[serde(default)]
    pub history: Vec<SalesHistory>,

    #[serde(default)]
    pub stock: Vec<StockItem>,

    #[serde(default)]
    pub purchase: Vec<PurchasePrice>,

    #[serde(default)]
    pub matches: Vec<ProductMatch>,
}

impl DashboardFiche {
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}
