//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay, server and function binary produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout/stderr log collection
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through server logs via the trace layer
//! - Credentials are never logged, only whether they are present

pub mod logging;
pub mod metrics;
