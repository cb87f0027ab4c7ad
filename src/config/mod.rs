//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared by the server, the function binary and the relay
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an absent file still yields a working relay
//! - The vendor credential is NOT part of the file; it is read from the
//!   environment on every request
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_port_override, load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, RelayConfig, RelaySettings, StaticFilesConfig,
    UpstreamConfig,
};
