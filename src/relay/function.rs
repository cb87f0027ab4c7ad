//! Serverless function hosting: event in, response out.
//!
//! The event and response documents follow the Netlify Functions JSON shape
//! so existing deployments and redirects keep working.

use axum::http::Method;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::schema::DIAGNOSTICS_PATH;
use crate::config::RelayConfig;
use crate::diagnostics::DiagnosticsReport;
use crate::relay::adapter::{body_text, serve, HostAdapter};
use crate::relay::error::RelayError;
use crate::relay::forwarder::Relay;
use crate::relay::request::{strip_any_mount, InboundRequest};
use crate::relay::response::RelayResponse;

/// Inbound function event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionEvent {
    pub path: String,
    pub http_method: String,
    pub headers: BTreeMap<String, String>,
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

/// Function result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Adapter for the serverless function variant.
#[derive(Debug, Clone)]
pub struct FunctionAdapter {
    mounts: Vec<String>,
}

impl FunctionAdapter {
    pub fn new(mounts: Vec<String>) -> Self {
        Self { mounts }
    }
}

impl HostAdapter for FunctionAdapter {
    type Request = FunctionEvent;
    type Response = FunctionResponse;

    fn inbound(&self, event: FunctionEvent) -> Result<InboundRequest, RelayError> {
        let method = if event.http_method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(event.http_method.to_ascii_uppercase().as_bytes())
                .map_err(|_| RelayError::InvalidMethod(event.http_method.clone()))?
        };

        let raw = match event.body {
            Some(body) if event.is_base64_encoded => base64::engine::general_purpose::STANDARD
                .decode(body.as_bytes())
                .map_err(|e| RelayError::InvalidBody(e.to_string()))?,
            Some(body) => body.into_bytes(),
            None => Vec::new(),
        };
        let body = body_text(&method, &raw)?;

        let query = event
            .query_string_parameters
            .unwrap_or_default()
            .into_iter()
            .collect();

        Ok(InboundRequest::new(method, strip_any_mount(&event.path, &self.mounts))
            .with_query(query)
            .with_body(body))
    }

    fn outbound(&self, response: RelayResponse) -> FunctionResponse {
        FunctionResponse {
            status_code: response.status.as_u16(),
            headers: response
                .headers()
                .map(|(name, value)| (canonical_header_name(name), value.to_string()))
                .collect(),
            body: response.body_string(),
        }
    }
}

/// `access-control-allow-origin` → `Access-Control-Allow-Origin`.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether an event targets the diagnostics function.
pub fn is_diagnostics_event(event: &FunctionEvent) -> bool {
    let path = event.path.trim_end_matches('/');
    path == DIAGNOSTICS_PATH || path == "/test"
}

/// Handle one function invocation end to end.
pub async fn handle_event(relay: &Relay, config: &RelayConfig, event: FunctionEvent) -> FunctionResponse {
    let adapter = FunctionAdapter::new(config.relay.mount_paths.clone());

    tracing::info!(
        path = %event.path,
        method = %event.http_method,
        headers = ?event.headers.keys().collect::<Vec<_>>(),
        query = ?event.query_string_parameters,
        has_body = event.body.is_some(),
        "Function invoked"
    );

    if is_diagnostics_event(&event) {
        let report = DiagnosticsReport::collect(config, relay.credentials());
        return adapter.outbound(report.into_response());
    }

    serve(relay, &adapter, event).await
}

/// Handle one raw event document; a malformed document still gets a
/// response document.
pub async fn handle_document(relay: &Relay, config: &RelayConfig, document: &str) -> FunctionResponse {
    match serde_json::from_str::<FunctionEvent>(document) {
        Ok(event) => handle_event(relay, config, event).await,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed function event");
            FunctionAdapter::new(config.relay.mount_paths.clone())
                .outbound(RelayError::InvalidBody(e.to_string()).into_response())
        }
    }
}
