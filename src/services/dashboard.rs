//! Dashboard service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{DashboardFiche, ProductFilters};
use crate::error::Result;

#[derive(Clone)]
pub struct DashboardService {
    client: ResourceClient,
}

impl DashboardService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/dashboard"),
        }
    }

    /// Product sheet: details, sales, history, stock, prices and matches
    pub async fn get_fiche(&self, filters: &ProductFilters) -> Result<DashboardFiche> {
        self.client
            .post("fiche", &[], &filters.build_payload())
            .await
    }
}
