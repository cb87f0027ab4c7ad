//! Relay-level failures and their client-facing shape.

use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::relay::response::{RelayBody, RelayResponse};

/// Errors that stop a request before (or instead of) relaying an upstream
/// response.
///
/// Non-2xx upstream statuses are not errors; they are relayed unchanged.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No vendor credential configured on the server.
    #[error("Missing HubSpot API key")]
    MissingCredential,

    /// Inbound body present but not JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Inbound body exceeds `security.max_body_size`.
    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// Inbound method is not a valid HTTP token.
    #[error("Invalid request method: {0}")]
    InvalidMethod(String),

    /// Network or transport failure talking to the vendor.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl RelayError {
    /// Status code returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidBody(_) | RelayError::InvalidMethod(_) => StatusCode::BAD_REQUEST,
            RelayError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingCredential => "missing_credential",
            RelayError::InvalidBody(_) => "invalid_body",
            RelayError::BodyTooLarge(_) => "body_too_large",
            RelayError::InvalidMethod(_) => "invalid_method",
            RelayError::Upstream(_) => "upstream",
        }
    }

    /// Structured JSON body: `error` plus `message` or `details`.
    pub fn body(&self) -> serde_json::Value {
        match self {
            RelayError::MissingCredential => json!({
                "error": "Missing HubSpot API key",
                "message": "The HubSpot API key is not configured in environment variables.",
            }),
            RelayError::InvalidBody(_) => json!({
                "error": "Invalid request body",
                "message": "The request body could not be parsed as JSON.",
            }),
            RelayError::BodyTooLarge(limit) => json!({
                "error": "Request body too large",
                "message": format!("The request body exceeds the {} byte limit.", limit),
            }),
            RelayError::InvalidMethod(method) => json!({
                "error": "Invalid request method",
                "message": format!("'{}' is not a valid HTTP method.", method),
            }),
            RelayError::Upstream(details) => json!({
                "error": "Error proxying request to HubSpot",
                "details": details,
            }),
        }
    }

    pub fn into_response(self) -> RelayResponse {
        RelayResponse::new(self.status(), RelayBody::Json(self.body()))
    }
}
