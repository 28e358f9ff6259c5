//! Identifier resolution service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{CodProList, ProductFilters};
use crate::error::Result;

#[derive(Clone)]
pub struct IdentifierService {
    client: ResourceClient,
}

impl IdentifierService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/identifiers"),
        }
    }

    /// Product codes matching any identifier in `filters`
    pub async fn resolve_codpro(&self, filters: &ProductFilters) -> Result<CodProList> {
        self.client
            .post("resolve-codpro", &[], &filters.build_payload())
            .await
    }
}
