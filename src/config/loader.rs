//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    let config: RelayConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the `PORT` override the hosting platforms set, keeping the bind host.
pub fn apply_port_override(config: &mut RelayConfig, port: Option<&str>) {
    let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) else {
        return;
    };
    let host = config
        .listener
        .bind_address
        .rsplit_once(':')
        .map(|(host, _)| host.to_string())
        .unwrap_or_else(|| "0.0.0.0".to_string());
    config.listener.bind_address = format!("{}:{}", host, port);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_bad_upstream() {
        let err = parse_config(
            r#"
            [upstream]
            base_url = "not a url"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("upstream.base_url"));
    }

    #[test]
    fn test_parse_reports_syntax_error() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_port_override() {
        let mut config = RelayConfig::default();
        apply_port_override(&mut config, Some("8888"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8888");

        apply_port_override(&mut config, Some("nope"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8888");

        apply_port_override(&mut config, None);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8888");
    }
}
