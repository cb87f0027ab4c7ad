//! CRM relay subsystem.
//!
//! # Data Flow
//! ```text
//! Host request (axum Request / function event)
//!     → adapter.rs (HostAdapter::inbound → InboundRequest)
//!     → forwarder.rs (preflight, credential, body check, upstream call)
//!     → response.rs (RelayResponse with fixed CORS header set)
//!     → adapter.rs (HostAdapter::outbound → host response)
//! ```
//!
//! # Design Decisions
//! - One forwarding routine; hosting variants differ only in adapters
//! - Credential resolved per request through `CredentialSource`
//! - Inbound callers are not authenticated; deployments must restrict
//!   access at the network layer

pub mod adapter;
pub mod credential;
pub mod error;
pub mod forwarder;
pub mod function;
pub mod request;
pub mod response;

pub use adapter::{serve, AxumAdapter, HostAdapter};
pub use credential::{CredentialSource, EnvCredential, StaticCredential};
pub use error::RelayError;
pub use forwarder::Relay;
pub use function::{handle_document, handle_event, FunctionAdapter, FunctionEvent, FunctionResponse};
pub use request::{InboundRequest, OutboundRequest};
pub use response::{RelayBody, RelayResponse};
