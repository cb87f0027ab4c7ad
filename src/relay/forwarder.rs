//! The relay routine shared by every hosting variant.
//!
//! # Flow
//! ```text
//! InboundRequest
//!     → OPTIONS?            → 200 preflight (no upstream call)
//!     → credential lookup   → 500 MissingCredential (no upstream call)
//!     → body JSON check     → 400 InvalidBody (no upstream call)
//!     → build vendor URL, inject bearer
//!     → one upstream call   → 500 Upstream on transport failure
//!     → RelayResponse (upstream status, JSON or raw text body)
//! ```
//!
//! No retries: every request is all-or-nothing.

use axum::http::{header, Method, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{RelayConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::relay::credential::{CredentialSource, EnvCredential};
use crate::relay::error::RelayError;
use crate::relay::request::{upstream_url, InboundRequest, OutboundRequest};
use crate::relay::response::{RelayBody, RelayResponse, JSON_CONTENT_TYPE};

/// Forwards inbound requests to the vendor API.
#[derive(Clone)]
pub struct Relay {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl Relay {
    /// Create a relay against the configured upstream.
    pub fn new(
        upstream: &UpstreamConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: upstream.base_url.clone(),
            credentials,
        })
    }

    /// Relay reading its credential from the configured environment variable.
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let credentials = Arc::new(EnvCredential::new(config.relay.credential_env.clone()));
        Self::new(&config.upstream, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &dyn CredentialSource {
        self.credentials.as_ref()
    }

    /// Relay one request. Failures come back as structured error responses.
    pub async fn forward(&self, request: InboundRequest) -> RelayResponse {
        let start = Instant::now();
        let method = request.method.clone();

        if method == Method::OPTIONS {
            tracing::debug!(path = %request.path, "Answering CORS preflight");
            metrics::record_request(method.as_str(), StatusCode::OK.as_u16(), start);
            return RelayResponse::preflight();
        }

        let response = match self.try_forward(request).await {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    RelayError::Upstream(details) => {
                        tracing::error!(error = %details, "Error proxying to upstream")
                    }
                    other => tracing::warn!(error = %other, "Request rejected before upstream call"),
                }
                metrics::record_rejection(e.kind());
                e.into_response()
            }
        };

        metrics::record_request(method.as_str(), response.status.as_u16(), start);
        response
    }

    /// Validate a request and turn it into an upstream call description.
    ///
    /// Checks run in a fixed order: credential first, then body.
    pub fn prepare(&self, request: InboundRequest) -> Result<OutboundRequest, RelayError> {
        let credential = self
            .credentials
            .credential()
            .ok_or(RelayError::MissingCredential)?;

        if let Some(body) = &request.body {
            serde_json::from_str::<serde_json::Value>(body)
                .map_err(|e| RelayError::InvalidBody(e.to_string()))?;
        }

        let url = upstream_url(&self.base_url, &request.path, &request.query)
            .map_err(|e| RelayError::Upstream(format!("invalid upstream URL: {}", e)))?;

        Ok(OutboundRequest {
            method: request.method,
            url,
            credential,
            body: request.body,
        })
    }

    async fn try_forward(&self, request: InboundRequest) -> Result<RelayResponse, RelayError> {
        let outbound = self.prepare(request)?;
        self.send(outbound).await
    }

    /// Issue the upstream call and classify its body.
    pub async fn send(&self, outbound: OutboundRequest) -> Result<RelayResponse, RelayError> {
        tracing::info!(
            method = %outbound.method,
            url = %outbound.url,
            has_body = outbound.body.is_some(),
            "Proxying request"
        );

        let mut builder = self
            .client
            .request(outbound.method, outbound.url)
            .bearer_auth(&outbound.credential)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = outbound.body {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;
        metrics::record_upstream_duration(status.as_u16(), started);

        tracing::info!(status = %status, "Upstream responded");

        let body = RelayBody::from_upstream(text);
        if matches!(body, RelayBody::Text(_)) {
            tracing::debug!("Upstream body is not JSON, relaying as text");
        }

        Ok(RelayResponse::new(status, body))
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("base_url", &self.base_url)
            .field("credential_configured", &self.credentials.is_configured())
            .finish()
    }
}
