//! Client-side redirection of vendor API calls onto the relay.
//!
//! # Data Flow
//! ```text
//! client code calls https://api.hubapi.com/crm/v3/...
//!     → rewriter.rs (host match → /.netlify/functions/hubspot/crm/v3/...)
//!     → layer.rs (tower Service over http::Request)
//!       or client.rs (reqwest wrapper)
//!     → relay on the site origin
//! ```
//!
//! # Design Decisions
//! - Installed explicitly at bootstrap; nothing is patched globally
//! - Calls already aimed at the relay, and calls to other hosts, pass through

pub mod client;
pub mod layer;
pub mod rewriter;

pub use client::RelayClient;
pub use layer::{RewriteLayer, RewriteService};
pub use rewriter::{UrlRewriter, VENDOR_HOST};
