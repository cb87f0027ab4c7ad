//! HTTP hosting for the long-running relay server.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, middleware)
//!     → request.rs (request id)
//!     → relay mount  → relay::AxumAdapter → relay::Relay
//!     → diagnostics  → diagnostics::DiagnosticsReport
//!     → anything else → static site (index.html fallback), if enabled
//! ```

pub mod request;
pub mod server;

pub use request::{request_id_of, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
