//! Mock transport for testing
//!
//! Serves canned JSON bodies keyed by method and path, and records every
//! request so tests can assert on paths, query strings and payloads.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::http::classify_status;
use super::{QueryParams, Transport};
use crate::error::Result;

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl CapturedRequest {
    /// Value of a query parameter, if it was sent
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
enum Canned {
    Body(Value),
    Status(u16, String),
}

/// Mock transport.
///
/// ```ignore
/// let mock = MockTransport::new().with_post("/sales/aggregate", json!([]));
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<(String, String), Canned>>>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(self, method: &str, path: &str, canned: Canned) -> Self {
        // The builder runs before any request, so the lock is uncontended.
        if let Ok(mut responses) = self.responses.try_lock() {
            responses.insert((method.to_string(), path.to_string()), canned);
        }
        self
    }

    /// Respond to `GET path` with `body`
    pub fn with_get(self, path: &str, body: Value) -> Self {
        self.insert("GET", path, Canned::Body(body))
    }

    /// Respond to `POST path` with `body`
    pub fn with_post(self, path: &str, body: Value) -> Self {
        self.insert("POST", path, Canned::Body(body))
    }

    /// Fail `method path` with an HTTP status and backend detail
    pub fn with_status(self, method: &str, path: &str, status: u16, detail: &str) -> Self {
        self.insert(method, path, Canned::Status(status, detail.to_string()))
    }

    /// Total number of requests received
    pub async fn call_count(&self) -> usize {
        self.captured.lock().await.len()
    }

    /// Requests received for a given path
    pub async fn calls_to(&self, path: &str) -> usize {
        self.captured
            .lock()
            .await
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// All captured requests, oldest first
    pub async fn calls(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }

    /// The most recent request, if any
    pub async fn last_call(&self) -> Option<CapturedRequest> {
        self.captured.lock().await.last().cloned()
    }

    async fn respond(
        &self,
        method: &'static str,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.captured.lock().await.push(CapturedRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: body.cloned(),
        });

        let canned = self
            .responses
            .lock()
            .await
            .get(&(method.to_string(), path.to_string()))
            .cloned();

        match canned {
            Some(Canned::Body(value)) => Ok(value),
            Some(Canned::Status(code, detail)) => {
                let status =
                    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Err(classify_status(status, detail, None).into())
            }
            None => Err(classify_status(
                StatusCode::NOT_FOUND,
                format!("no canned response for {} {}", method, path),
                None,
            )
            .into()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value> {
        self.respond("GET", path, query, None).await
    }

    async fn post(&self, path: &str, query: &QueryParams, body: &Value) -> Result<Value> {
        self.respond("POST", path, query, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, Error};
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_returns_canned_body() {
        let mock = MockTransport::new().with_get("/ping", json!({"ok": true}));
        let body = mock.get("/ping", &[]).await.unwrap();
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_status_goes_through_classification() {
        let mock = MockTransport::new().with_status("POST", "/x", 503, "down");
        let err = mock.post("/x", &[], &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_mock_captures_query() {
        let mock = MockTransport::new().with_get("/q", json!([]));
        mock.get("/q", &[("query", "abc".to_string())]).await.unwrap();
        let call = mock.last_call().await.unwrap();
        assert_eq!(call.query_value("query"), Some("abc"));
        assert_eq!(call.method, "GET");
    }
}
