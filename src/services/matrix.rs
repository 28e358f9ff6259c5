//! Matrix view service

use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{MatrixCell, MatrixView, MatrixViewFilter, ProductFilters};
use crate::error::Result;

#[derive(Clone)]
pub struct MatrixService {
    client: ResourceClient,
}

impl MatrixService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/matrix"),
        }
    }

    pub async fn get_view(&self, filters: &ProductFilters) -> Result<MatrixView> {
        self.client
            .post("view", &[], &filters.build_payload())
            .await
    }

    /// Matrix view narrowed by quality, family, status or free text
    pub async fn get_view_filtered(
        &self,
        filters: &ProductFilters,
        extra: &MatrixViewFilter,
    ) -> Result<MatrixView> {
        let mut payload = filters.build_payload();
        if let (Value::Object(base), Ok(Value::Object(more))) =
            (&mut payload, serde_json::to_value(extra))
        {
            base.extend(more);
        }
        self.client.post("view/filtered", &[], &payload).await
    }

    pub async fn get_cell(&self, cod_pro: i64, reference: &str) -> Result<MatrixCell> {
        let endpoint = format!("cell/{}/{}", cod_pro, encode_segment(reference));
        self.client.get(&endpoint, &[]).await
    }
}

/// Percent-encode one path segment so references containing `/`, spaces
/// or `#` survive the round trip.
pub fn encode_segment(segment: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return segment.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use serde_json::json;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("ABC123"), "ABC123");
        assert_eq!(encode_segment("A/B C"), "A%2FB%20C");
        assert_eq!(encode_segment("x#y"), "x%23y");
    }

    #[tokio::test]
    async fn test_get_cell_encodes_reference() {
        let mock = MockTransport::new().with_get(
            "/matrix/cell/5/A%2FB",
            json!({"cod_pro": 5, "ref": "A/B", "message": "ok"}),
        );
        let service = MatrixService::new(Arc::new(mock));
        let cell = service.get_cell(5, "A/B").await.unwrap();
        assert_eq!(cell.reference, "A/B");
    }

    #[tokio::test]
    async fn test_filtered_view_merges_extra_criteria() {
        let mock = MockTransport::new().with_post("/matrix/view/filtered", json!({}));
        let service = MatrixService::new(Arc::new(mock.clone()));
        let extra = MatrixViewFilter {
            qualite: Some("PMV".into()),
            ..Default::default()
        };

        service
            .get_view_filtered(&ProductFilters::for_cod_pro(2), &extra)
            .await
            .unwrap();

        let body = mock.last_call().await.unwrap().body.unwrap();
        assert_eq!(body["cod_pro"], json!(2));
        assert_eq!(body["qualite"], json!("PMV"));
    }
}
