//! Stock service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{ProductFilters, StockHistoryList, StockList};
use crate::error::Result;

#[derive(Clone)]
pub struct StockService {
    client: ResourceClient,
}

impl StockService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/stock"),
        }
    }

    pub async fn get_current(&self, filters: &ProductFilters) -> Result<StockList> {
        self.client
            .post("current", &[], &filters.build_payload())
            .await
    }

    pub async fn get_history(
        &self,
        filters: &ProductFilters,
        last_n_months: u32,
    ) -> Result<StockHistoryList> {
        self.client
            .post(
                "history",
                &[("last_n_months", last_n_months.to_string())],
                &filters.build_payload(),
            )
            .await
    }
}
