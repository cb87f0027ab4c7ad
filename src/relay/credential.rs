//! Server-side credential lookup.
//!
//! The vendor credential is resolved on every request, never cached, so a
//! rotated key takes effect without a restart. Only an absent or empty value
//! counts as missing.

/// Source of the bearer token injected into upstream calls.
pub trait CredentialSource: Send + Sync {
    /// Current credential, or `None` when it is not configured.
    fn credential(&self) -> Option<String>;

    /// Whether a credential is configured, without exposing it.
    fn is_configured(&self) -> bool {
        self.credential().is_some()
    }
}

/// Reads the credential from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|value| !value.is_empty())
    }
}

/// Fixed credential, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(credential: impl Into<String>) -> Self {
        Self(Some(credential.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone().filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credential() {
        assert_eq!(StaticCredential::new("pat-123").credential().as_deref(), Some("pat-123"));
        assert!(!StaticCredential::missing().is_configured());
        assert!(!StaticCredential::new("").is_configured());
        // Only absent or empty counts as missing; the vendor judges the rest.
        assert!(StaticCredential::new("  ").is_configured());
    }

    #[test]
    fn test_env_credential_unset_variable() {
        let source = EnvCredential::new("CRM_RELAY_TEST_SURELY_UNSET_VARIABLE");
        assert!(source.credential().is_none());
    }
}
