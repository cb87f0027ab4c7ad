//! CRM relay library.
//!
//! Forwards browser calls to the HubSpot API from a server that holds the
//! credential, in two hosting variants (axum server, serverless function)
//! sharing one relay routine, plus the client-side rewriter that sends
//! vendor-bound calls to the relay.

pub mod config;
pub mod diagnostics;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod relay;
pub mod rewrite;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
pub use rewrite::{RelayClient, UrlRewriter};
