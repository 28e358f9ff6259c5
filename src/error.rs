//! Error types for the cbmx CLI

use std::time::Duration;
use thiserror::Error;

/// Result type alias for cbmx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors, classified once by the transport from the HTTP status
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication required by the API")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Service temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status this error was built from, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Validation(_) => Some(422),
            ApiError::RateLimit(_) => Some(429),
            ApiError::ServerError(_) => Some(500),
            ApiError::Unavailable(_) => Some(503),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// Short message suitable for the error block of a page.
    pub fn ui_message(&self) -> String {
        match self {
            ApiError::BadRequest(_) => "Invalid request data".to_string(),
            ApiError::Unauthorized => "Authentication required".to_string(),
            ApiError::Forbidden => "Access not allowed".to_string(),
            ApiError::NotFound(_) => "Resource not found".to_string(),
            ApiError::Validation(_) => "Incorrect validation data".to_string(),
            ApiError::ServerError(_) => "Internal server error".to_string(),
            ApiError::Unavailable(_) => "Service temporarily unavailable".to_string(),
            ApiError::Network(_) => "Unable to reach the server".to_string(),
            ApiError::InvalidResponse(detail) if !detail.trim().is_empty() => detail.clone(),
            ApiError::RateLimit(_) | ApiError::InvalidResponse(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `cbmx init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error(
        "API URL is not configured in production mode. Set CBMX_API_URL or run `cbmx init`."
    )]
    MissingApiUrl,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Cache storage errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,

    #[error("Failed to write export file: {0}")]
    Write(String),

    #[error("Failed to serialize export: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_not_found() {
        let err = ApiError::NotFound("product 42".to_string());
        assert!(err.to_string().contains("product 42"));
    }

    #[test]
    fn test_api_error_rate_limit() {
        let err = ApiError::RateLimit(Duration::from_secs(30));
        let msg = err.to_string();
        assert!(msg.contains("Rate limit"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), Some(400));
        assert_eq!(ApiError::Validation(String::new()).status(), Some(422));
        assert_eq!(ApiError::Unavailable(String::new()).status(), Some(503));
        assert_eq!(ApiError::Network(String::new()).status(), None);
    }

    #[test]
    fn test_ui_messages_per_status() {
        assert_eq!(
            ApiError::BadRequest("x".into()).ui_message(),
            "Invalid request data"
        );
        assert_eq!(ApiError::Unauthorized.ui_message(), "Authentication required");
        assert_eq!(ApiError::Forbidden.ui_message(), "Access not allowed");
        assert_eq!(ApiError::NotFound("x".into()).ui_message(), "Resource not found");
        assert_eq!(
            ApiError::Validation("x".into()).ui_message(),
            "Incorrect validation data"
        );
        assert_eq!(
            ApiError::ServerError("x".into()).ui_message(),
            "Internal server error"
        );
        assert_eq!(
            ApiError::Unavailable("x".into()).ui_message(),
            "Service temporarily unavailable"
        );
    }

    #[test]
    fn test_config_error_missing_api_url() {
        let err = ConfigError::MissingApiUrl;
        assert!(err.to_string().contains("CBMX_API_URL"));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::Forbidden.into();
        match err {
            Error::Api(ApiError::Forbidden) => (),
            _ => panic!("Expected Error::Api(ApiError::Forbidden)"),
        }
    }

    #[test]
    fn test_error_from_export_error() {
        let err: Error = ExportError::Empty.into();
        assert!(err.to_string().contains("No data"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: [yaml: content")
            .unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
