//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check mount paths are absolute and distinct
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match url::Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("'{}' is not a URL: {}", config.upstream.base_url, e),
        )),
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be > 0"));
    }

    if config.relay.mount_paths.is_empty() {
        errors.push(ValidationError::new("relay.mount_paths", "at least one mount path is required"));
    }
    let mut seen = HashSet::new();
    for path in &config.relay.mount_paths {
        if !path.starts_with('/') || path.len() < 2 {
            errors.push(ValidationError::new(
                "relay.mount_paths",
                format!("'{}' must be an absolute path below /", path),
            ));
        }
        if !seen.insert(path.trim_end_matches('/')) {
            errors.push(ValidationError::new(
                "relay.mount_paths",
                format!("'{}' is listed twice", path),
            ));
        }
    }

    if config.relay.credential_env.trim().is_empty() {
        errors.push(ValidationError::new("relay.credential_env", "must not be empty"));
    }

    if config.static_files.enabled && config.static_files.dir.trim().is_empty() {
        errors.push(ValidationError::new("static_files.dir", "must not be empty when enabled"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
