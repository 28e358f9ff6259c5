//! Autocomplete suggestion service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{RefintCodproSuggestion, SuggestionResponse};
use crate::error::Result;

#[derive(Clone)]
pub struct SuggestionService {
    client: ResourceClient,
}

impl SuggestionService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/suggestions"),
        }
    }

    /// Internal references (with product codes) matching `query`
    pub async fn refint_or_codpro(&self, query: &str) -> Result<Vec<RefintCodproSuggestion>> {
        self.client
            .get("refint-codpro", &[("query", query.to_string())])
            .await
    }

    pub async fn ref_crn(&self, query: &str) -> Result<SuggestionResponse> {
        self.client
            .get("refcrn", &[("query", query.to_string())])
            .await
    }

    pub async fn ref_ext(&self, query: &str) -> Result<SuggestionResponse> {
        self.client
            .get("ref_ext", &[("query", query.to_string())])
            .await
    }

    /// Manufacturer references attached to one product
    pub async fn ref_crn_by_codpro(&self, cod_pro: i64) -> Result<SuggestionResponse> {
        self.client
            .get("refcrn_by_codpro", &[("cod_pro", cod_pro.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_refint_suggestions_are_a_list() {
        let mock = MockTransport::new().with_get(
            "/suggestions/refint-codpro",
            json!([{"refint": "ABC", "cod_pro": 10}]),
        );
        let service = SuggestionService::new(Arc::new(mock.clone()));
        let list = service.refint_or_codpro("AB").await.unwrap();
        assert_eq!(list[0].cod_pro, 10);
        assert_eq!(
            mock.last_call().await.unwrap().query_value("query"),
            Some("AB")
        );
    }

    #[tokio::test]
    async fn test_reference_suggestion_paths() {
        let mock = MockTransport::new()
            .with_get("/suggestions/refcrn", json!({"results": ["C1"]}))
            .with_get("/suggestions/ref_ext", json!({"results": ["E1"]}))
            .with_get("/suggestions/refcrn_by_codpro", json!({"results": []}));
        let service = SuggestionService::new(Arc::new(mock.clone()));

        assert_eq!(service.ref_crn("C").await.unwrap().results, vec!["C1"]);
        assert_eq!(service.ref_ext("E").await.unwrap().results, vec!["E1"]);
        service.ref_crn_by_codpro(77).await.unwrap();
        assert_eq!(
            mock.last_call().await.unwrap().query_value("cod_pro"),
            Some("77")
        );
    }
}
