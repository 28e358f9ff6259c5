//! Purchase service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{ProductFilters, PurchasePriceList};
use crate::error::Result;

#[derive(Clone)]
pub struct PurchaseService {
    client: ResourceClient,
}

impl PurchaseService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/purchase"),
        }
    }

    pub async fn get_prices(&self, filters: &ProductFilters) -> Result<PurchasePriceList> {
        self.client
            .post("price", &[], &filters.build_payload())
            .await
    }
}
