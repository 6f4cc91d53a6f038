//! Client Error Types
//!
//! Errors surfaced by the backend HTTP client. Nothing here is retried or
//! translated: a failed request reaches the caller exactly as it happened.

use thiserror::Error;

/// Errors that can occur when talking to the backend API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure; no HTTP status was received
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error {status}: {body}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// The configured base URL could not be parsed
    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(serde_json::Error),
}

impl ClientError {
    /// HTTP status code, if the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body attached to an HTTP failure
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ClientError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Backend-provided error message (`error` or `message` field), if any
    pub fn message(&self) -> Option<&str> {
        let body = self.body()?;
        body.get("error")
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .or_else(|| body.as_str())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_accessors() {
        let err = ClientError::Status {
            status: 404,
            body: json!({"error": "Survey not found", "code": 404}),
        };

        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.message(), Some("Survey not found"));
    }

    #[test]
    fn test_plain_text_body_message() {
        let err = ClientError::Status {
            status: 502,
            body: json!("Bad Gateway"),
        };

        assert_eq!(err.message(), Some("Bad Gateway"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_url_error_has_no_status() {
        let err = ClientError::InvalidUrl {
            url: "localhost:5000".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert_eq!(
            err.to_string(),
            "Invalid base URL localhost:5000: relative URL without a base"
        );
    }
}
