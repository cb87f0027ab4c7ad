//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Vendor API the relay forwards to.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.hubapi.com";

/// Mount path used by the serverless deployment and the browser rewriter.
pub const FUNCTION_MOUNT_PATH: &str = "/.netlify/functions/hubspot";

/// Mount path used by the standalone server.
pub const SERVER_MOUNT_PATH: &str = "/hubspot-api";

/// Path of the diagnostics function.
pub const DIAGNOSTICS_PATH: &str = "/.netlify/functions/test";

/// Environment variable holding the vendor API credential.
pub const DEFAULT_CREDENTIAL_ENV: &str = "VITE_HUBSPOT_API_KEY";

/// Environment variable toggling the front-end mock CRM mode.
pub const DEFAULT_MOCK_MODE_ENV: &str = "VITE_USE_MOCK_CRM";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream vendor API settings.
    pub upstream: UpstreamConfig,

    /// Relay mount points and credential lookup.
    pub relay: RelaySettings,

    /// Static site hosting for the standalone server.
    pub static_files: StaticFilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Upstream vendor API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every relayed path is appended to.
    pub base_url: String,

    /// Total timeout for one upstream call. Unset leaves the client default.
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Relay mount and credential settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Path prefixes the relay is mounted under. Stripped before forwarding.
    pub mount_paths: Vec<String>,

    /// Environment variable read on every request for the bearer credential.
    pub credential_env: String,

    /// Environment variable carrying the mock CRM flag (reported only).
    pub mock_mode_env: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            mount_paths: vec![
                FUNCTION_MOUNT_PATH.to_string(),
                SERVER_MOUNT_PATH.to_string(),
            ],
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
            mock_mode_env: DEFAULT_MOCK_MODE_ENV.to_string(),
        }
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve the built site alongside the relay.
    pub enabled: bool,

    /// Directory holding the built site; `index.html` is the fallback.
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: "dist".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_vendor() {
        let config = RelayConfig::default();
        assert_eq!(config.upstream.base_url, "https://api.hubapi.com");
        assert!(config.upstream.timeout_secs.is_none());
        assert_eq!(config.relay.credential_env, "VITE_HUBSPOT_API_KEY");
        assert!(config
            .relay
            .mount_paths
            .iter()
            .any(|p| p == "/.netlify/functions/hubspot"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://127.0.0.1:9000"

            [static_files]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000");
        assert!(config.static_files.enabled);
        assert_eq!(config.static_files.dir, "dist");
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
