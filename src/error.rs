//! Error types for blob fetching
//!
//! Provides unified error handling using thiserror. The store itself has no
//! failure modes; every error here comes from turning a key into bytes over
//! the network.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Reasons a blob could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The key is not a fetchable URL
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with something other than 200
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Connectivity, timeout or protocol failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response had an unexpected shape
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// == Status Kind ==
/// Coarse classification of an HTTP failure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Unauthorized,
    RateLimited,
    ServerError,
    Other,
}

impl StatusKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            401 => StatusKind::Unauthorized,
            429 => StatusKind::RateLimited,
            500..=599 => StatusKind::ServerError,
            _ => StatusKind::Other,
        }
    }
}

impl FetchError {
    /// Status classification for `HttpStatus` errors, `None` otherwise.
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            FetchError::HttpStatus(code) => Some(StatusKind::from_code(*code)),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            FetchError::InvalidRequest(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = match &self {
            FetchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FetchError::HttpStatus(_) => StatusCode::BAD_GATEWAY,
            FetchError::Transport(_) => StatusCode::BAD_GATEWAY,
            FetchError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kind_classification() {
        assert_eq!(StatusKind::from_code(401), StatusKind::Unauthorized);
        assert_eq!(StatusKind::from_code(429), StatusKind::RateLimited);
        assert_eq!(StatusKind::from_code(500), StatusKind::ServerError);
        assert_eq!(StatusKind::from_code(503), StatusKind::ServerError);
        assert_eq!(StatusKind::from_code(404), StatusKind::Other);
        assert_eq!(StatusKind::from_code(204), StatusKind::Other);
    }

    #[test]
    fn test_status_kind_only_for_http_errors() {
        assert_eq!(
            FetchError::HttpStatus(429).status_kind(),
            Some(StatusKind::RateLimited)
        );
        assert_eq!(FetchError::Transport("reset".into()).status_kind(), None);
    }

    #[test]
    fn test_error_display_preserves_code() {
        let err = FetchError::HttpStatus(503);
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[test]
    fn test_into_response_status() {
        let cases = [
            (FetchError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (FetchError::HttpStatus(404), StatusCode::BAD_GATEWAY),
            (FetchError::Transport("refused".into()), StatusCode::BAD_GATEWAY),
            (FetchError::Unknown("odd".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
