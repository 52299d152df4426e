//! CORS-bypassing reverse proxy for the PNCP consultation API.
//!
//! Browser requests arrive under one of several local prefixes, are mapped
//! onto the upstream API root, forwarded once, and relayed back with
//! permissive CORS headers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ForwardingHandler;
