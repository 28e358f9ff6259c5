//! Sales service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{ProductFilters, SalesAggregateList, SalesHistoryList};
use crate::error::Result;

#[derive(Clone)]
pub struct SalesService {
    client: ResourceClient,
}

impl SalesService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/sales"),
        }
    }

    pub async fn get_history(
        &self,
        filters: &ProductFilters,
        last_n_months: u32,
    ) -> Result<SalesHistoryList> {
        self.client
            .post(
                "history",
                &[("last_n_months", last_n_months.to_string())],
                &filters.build_payload(),
            )
            .await
    }

    pub async fn get_aggregate(&self, filters: &ProductFilters) -> Result<SalesAggregateList> {
        self.client
            .post("aggregate", &[], &filters.build_payload())
            .await
    }
}
