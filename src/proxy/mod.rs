//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → handler.rs (preflight, resolve, forward)
//!     → upstream.rs (one request to the upstream API)
//!     → OutboundResponse (relayed, or error.rs rendering)
//! ```
//!
//! # Design Decisions
//! - Stateless per request; the pooled client is the only shared value
//! - A single attempt per request, no retries
//! - Errors become responses, never panics

pub mod error;
pub mod handler;
pub mod upstream;

pub use error::{PathDiagnostics, ProxyError};
pub use handler::{ForwardingHandler, Outcome};
pub use upstream::{ClientError, UpstreamClient, UpstreamResponse};
