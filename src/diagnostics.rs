//! Deployment self-check.
//!
//! Reports whether the relay is deployed and configured, without ever
//! exposing the credential itself.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::RelayConfig;
use crate::relay::credential::CredentialSource;
use crate::relay::response::{RelayBody, RelayResponse};

pub const AVAILABLE: &str = "Available";
pub const NOT_SET: &str = "Not set";
pub const CREDENTIAL_SET: &str = "Set (hidden for security)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentStatus {
    pub hubspot_api_key: String,
    pub mock_crm_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionStatus {
    pub test: String,
    pub hubspot: String,
}

/// Body served by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub status: String,
    pub message: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub environment: EnvironmentStatus,
    pub functions: FunctionStatus,
}

impl DiagnosticsReport {
    pub fn collect(config: &RelayConfig, credentials: &dyn CredentialSource) -> Self {
        let hubspot_api_key = if credentials.is_configured() {
            CREDENTIAL_SET
        } else {
            NOT_SET
        };
        let mock_crm_mode = std::env::var(&config.relay.mock_mode_env)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_SET.to_string());

        Self {
            status: "success".to_string(),
            message: "Relay functions are working!".to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            environment: EnvironmentStatus {
                hubspot_api_key: hubspot_api_key.to_string(),
                mock_crm_mode,
            },
            functions: FunctionStatus {
                test: AVAILABLE.to_string(),
                hubspot: AVAILABLE.to_string(),
            },
        }
    }

    pub fn into_response(self) -> RelayResponse {
        let body = serde_json::to_value(&self).unwrap_or_default();
        RelayResponse::new(StatusCode::OK, RelayBody::Json(body))
    }
}
