//! Relayed response model and the fixed header set.
//!
//! Every response leaving the relay, preflight and errors included, carries
//! a JSON content type and the permissive cross-origin headers. Upstream
//! response headers are not copied.

use axum::http::{header, HeaderName, StatusCode};
use serde_json::json;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers attached to every relay response.
pub static RESPONSE_HEADERS: [(HeaderName, &str); 4] = [
    (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
    (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
];

/// Upstream body as relayed: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayBody {
    Json(serde_json::Value),
    Text(String),
}

impl RelayBody {
    /// Classify an upstream body.
    pub fn from_upstream(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => RelayBody::Json(value),
            Err(_) => RelayBody::Text(text),
        }
    }
}

/// Response handed back to the hosting adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: RelayBody,
}

impl RelayResponse {
    pub fn new(status: StatusCode, body: RelayBody) -> Self {
        Self { status, body }
    }

    /// Short-circuit answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self::new(
            StatusCode::OK,
            RelayBody::Json(json!({ "message": "CORS preflight response" })),
        )
    }

    /// Header set as `(name, value)` string pairs.
    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        RESPONSE_HEADERS.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Serialized body. JSON is re-encoded compactly; text goes out as-is.
    pub fn body_string(&self) -> String {
        match &self.body {
            RelayBody::Json(value) => value.to_string(),
            RelayBody::Text(text) => text.clone(),
        }
    }
}
