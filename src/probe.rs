//! Deployment probes: is the diagnostics function up, does the relay reach
//! the vendor, and is the vendor reachable directly.
//!
//! A 401 from the relay still counts as success: the relay answered and the
//! vendor rejected the credential.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::schema::DIAGNOSTICS_PATH;
use crate::rewrite::{RelayClient, VENDOR_HOST};

/// Vendor endpoint used by the relay and direct probes.
pub const PROBE_PATH: &str = "crm/v3/properties/contacts";

/// Deadline for the direct vendor probe.
pub const DIRECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Runs probes against a deployed site.
#[derive(Debug, Clone)]
pub struct Prober {
    client: RelayClient,
}

impl Prober {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }

    /// GET the diagnostics function.
    pub async fn check_functions(&self) -> ProbeOutcome {
        let request = match self.client.get(DIAGNOSTICS_PATH) {
            Ok(request) => request,
            Err(e) => return ProbeOutcome::failed(e.to_string()),
        };

        match request.send().await {
            Ok(response) if response.status().is_success() => match response.json::<Value>().await {
                Ok(body) => ProbeOutcome::ok(body),
                Err(e) => ProbeOutcome::failed(e.to_string()),
            },
            Ok(response) => {
                ProbeOutcome::failed(format!("diagnostics returned status {}", response.status()))
            }
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }

    /// GET a vendor endpoint through the relay.
    pub async fn check_relay(&self) -> ProbeOutcome {
        let url = format!("https://{}/{}", VENDOR_HOST, PROBE_PATH);
        let request = match self.client.get(&url) {
            Ok(request) => request,
            Err(e) => return ProbeOutcome::failed(e.to_string()),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::failed(e.to_string()),
        };
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            ProbeOutcome::ok(json!({
                "status": status.as_u16(),
                "hasData": !body.is_empty(),
            }))
        } else if status == StatusCode::UNAUTHORIZED {
            ProbeOutcome::ok(json!({
                "status": 401,
                "statusText": "Unauthorized - relay is working but the API key may be invalid",
                "error": serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body)),
            }))
        } else {
            ProbeOutcome::failed(format!("relay returned status {}", status))
        }
    }

    /// GET the vendor directly with a bearer credential and a 5 second
    /// deadline, bypassing the rewriter.
    pub async fn check_direct(&self, base_url: &str, credential: &str) -> ProbeOutcome {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), PROBE_PATH);
        let client = match reqwest::Client::builder().timeout(DIRECT_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::failed(e.to_string()),
        };

        match client.get(&url).bearer_auth(credential).send().await {
            Ok(response) if response.status().is_success() => ProbeOutcome::ok(json!({
                "status": response.status().as_u16(),
                "message": "Direct access to the vendor API works",
            })),
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => ProbeOutcome::ok(json!({
                "status": 401,
                "message": "Vendor reachable directly; the API key was rejected",
            })),
            Ok(response) => ProbeOutcome::failed(format!("vendor returned status {}", response.status())),
            Err(e) if e.is_timeout() => ProbeOutcome::failed(format!(
                "vendor did not answer within {}s",
                DIRECT_TIMEOUT.as_secs()
            )),
            Err(e) => ProbeOutcome::failed(e.to_string()),
        }
    }
}
