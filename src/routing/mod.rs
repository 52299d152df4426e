//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (path param, path, headers, query sources)
//!     → resolver.rs (walk rules, normalize, validate)
//!     → matcher.rs (evaluate one (source, prefix) rule)
//!     → query.rs (pick one query source and encode it)
//!     → Return: ResolvedTarget or PathRejection
//!
//! Rule Compilation (at startup):
//!     RoutingConfig
//!     → sources × prefixes, in priority order
//!     → Freeze as immutable ResolverRules
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always resolves the same way
//! - First match wins

pub mod matcher;
pub mod query;
pub mod resolver;

pub use matcher::{PathSource, PrefixRule, ResolverRules};
pub use query::resolve_query;
pub use resolver::{PathRejection, PathResolver, RejectReason};

/// Canonical upstream target for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Non-empty, no leading slash, no `..`.
    pub upstream_path: String,
    /// Possibly empty; no leading `?`.
    pub query_string: String,
}

impl ResolvedTarget {
    /// Append path and query to an upstream base.
    pub fn url(&self, base: &str) -> String {
        if self.query_string.is_empty() {
            format!("{}{}", base, self.upstream_path)
        } else {
            format!("{}{}?{}", base, self.upstream_path, self.query_string)
        }
    }
}
