//! Shared plumbing for resource services

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{QueryParams, Transport};
use crate::error::{ApiError, Result};

/// Transport bound to one backend resource prefix, e.g. `/sales`.
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
    prefix: &'static str,
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn Transport>, prefix: &'static str) -> Self {
        Self { transport, prefix }
    }

    /// Full path for an endpoint under this resource
    pub fn path(&self, endpoint: &str) -> String {
        if endpoint.is_empty() {
            self.prefix.to_string()
        } else {
            format!("{}/{}", self.prefix, endpoint)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &QueryParams) -> Result<T> {
        let path = self.path(endpoint);
        let body = self.transport.get(&path, query).await?;
        decode(&path, body)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryParams,
        payload: &Value,
    ) -> Result<T> {
        let path = self.path(endpoint);
        let body = self.transport.post(&path, query, payload).await?;
        decode(&path, body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| {
        log::debug!("Failed to decode {}: {}", path, e);
        ApiError::InvalidResponse(format!("{}: {}", path, e)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_path_joins_prefix() {
        let client = ResourceClient::new(Arc::new(MockTransport::new()), "/sales");
        assert_eq!(client.path("history"), "/sales/history");
        assert_eq!(client.path(""), "/sales");
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_invalid_response() {
        let mock = MockTransport::new().with_get("/x/y", json!("not a list"));
        let client = ResourceClient::new(Arc::new(mock), "/x");
        let err = client.get::<Vec<i64>>("y", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidResponse(_))));
    }
}
