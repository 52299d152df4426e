//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add request ID, describe as InboundRequest)
//!     → proxy::ForwardingHandler (resolve, forward)
//!     → response.rs (OutboundResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, MakeRequestUuid, X_REQUEST_ID};
pub use response::{OutboundResponse, JSON_CONTENT_TYPE};
pub use server::HttpServer;
