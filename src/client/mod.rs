//! Product explorer API client
//!
//! The [`Transport`] trait is the single seam between the services and the
//! network: services build paths and payloads, the transport performs the
//! call and classifies failures.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use http::ApiClient;
#[cfg(test)]
pub use mock::MockTransport;

/// Query-string parameters attached to a request
pub type QueryParams = [(&'static str, String)];

/// JSON transport for the product explorer API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and return the parsed JSON body
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value>;

    /// Issue a POST with a JSON body and return the parsed JSON body
    async fn post(&self, path: &str, query: &QueryParams, body: &Value) -> Result<Value>;
}
