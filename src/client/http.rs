//! reqwest-backed transport

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde_json::Value;

use super::{QueryParams, Transport};
use crate::error::{ApiError, Result};

/// Header carrying the per-request trace identifier
pub const TRACE_HEADER: &str = "X-Trace-ID";

static TRACE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// HTTP client for the product explorer API
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ApiClient {
    /// Create a client for `base_url` (no trailing slash).
    pub fn new(base_url: &str, timeout: Duration, requests_per_second: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let trace_id = next_trace_id();
        let url = format!("{}{}", self.base_url, path);
        log::debug!("[{}] {} {} params={:?}", trace_id, method, url, query);
        if let Some(body) = body {
            log::trace!("[{}] body={}", trace_id, body);
        }

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(TRACE_HEADER, &trace_id);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            log::warn!("[{}] network error: {}", trace_id, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        log::debug!(
            "[{}] {} in {}ms",
            trace_id,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if status.is_success() {
            return read_json(response).await;
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await.unwrap_or_default();
        let err = classify_status(status, extract_detail(&text), retry_after);
        log::warn!("[{}] {} {} failed: {}", trace_id, method, url, err);
        Err(err.into())
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, query: &QueryParams, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, query, Some(body)).await
    }
}

fn next_trace_id() -> String {
    let seq = TRACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("trace-{}-{:04x}", Utc::now().timestamp_millis(), seq)
}

async fn read_json(response: Response) -> Result<Value> {
    let bytes = response.bytes().await.map_err(ApiError::from)?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
    })
}

/// Pull the backend's `detail` field out of an error body, if any.
///
/// Validation errors carry a list of objects as detail; those are kept as
/// compact JSON.
pub fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

/// Map a non-success status to its [`ApiError`] variant.
pub fn classify_status(status: StatusCode, detail: String, retry_after: Option<u64>) -> ApiError {
    let detail = if detail.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        detail
    };

    match status {
        StatusCode::BAD_REQUEST => ApiError::BadRequest(detail),
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(detail),
        StatusCode::TOO_MANY_REQUESTS => {
            ApiError::RateLimit(Duration::from_secs(retry_after.unwrap_or(60)))
        }
        StatusCode::SERVICE_UNAVAILABLE => ApiError::Unavailable(detail),
        s if s.is_server_error() => ApiError::ServerError(detail),
        s => ApiError::InvalidResponse(format!("Unexpected status code {}: {}", s, detail)),
    }
}
