//! Path source and prefix rules.
//!
//! # Responsibilities
//! - Read a candidate path from one source of an inbound request
//! - Match a candidate against one known prefix and return the suffix
//! - Expand (sources × prefixes) into an ordered rule list
//!
//! # Design Decisions
//! - Rules are plain data; the resolver only walks them in order
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

use crate::config::RoutingConfig;
use crate::http::request::InboundRequest;

/// Where a candidate path is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// Explicit path parameter supplied by the hosting layer.
    PathParam,
    /// The primary request path.
    RequestPath,
    /// A header carrying the original path before a rewrite.
    OriginalPathHeader(String),
}

impl PathSource {
    /// Read this source from a request, if present.
    pub fn read<'a>(&self, req: &'a InboundRequest) -> Option<&'a str> {
        match self {
            PathSource::PathParam => req.path_param.as_deref(),
            PathSource::RequestPath => Some(req.path.as_str()),
            PathSource::OriginalPathHeader(name) => req.header(name),
        }
    }
}

/// A single (source, prefix) extraction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    pub source: PathSource,
    pub prefix: String,
}

impl PrefixRule {
    pub fn new(source: PathSource, prefix: impl Into<String>) -> Self {
        Self {
            source,
            prefix: prefix.into(),
        }
    }

    /// Return the suffix following the prefix when the rule matches.
    pub fn apply<'a>(&self, req: &'a InboundRequest) -> Option<&'a str> {
        self.source.read(req)?.strip_prefix(self.prefix.as_str())
    }
}

/// Ordered rule list, evaluated first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverRules {
    rules: Vec<PrefixRule>,
}

impl ResolverRules {
    /// Expand sources in priority order (path parameter, request path,
    /// original-path headers), each tried against every prefix in order.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let sources = [PathSource::PathParam, PathSource::RequestPath]
            .into_iter()
            .chain(
                config
                    .original_path_headers
                    .iter()
                    .map(|h| PathSource::OriginalPathHeader(h.to_ascii_lowercase())),
            );

        let mut rules = Vec::new();
        for source in sources {
            for prefix in &config.prefixes {
                rules.push(PrefixRule::new(source.clone(), prefix.clone()));
            }
        }
        Self { rules }
    }

    /// Sources whose values are echoed back when resolution fails.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = Vec::new();
        self.rules.iter().filter_map(move |rule| match &rule.source {
            PathSource::OriginalPathHeader(name) if !seen.contains(&name.as_str()) => {
                seen.push(name.as_str());
                Some(name.as_str())
            }
            _ => None,
        })
    }

    /// First matching rule and its suffix.
    pub fn first_match<'r, 'a>(
        &'r self,
        req: &'a InboundRequest,
    ) -> Option<(&'r PrefixRule, &'a str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(req).map(|suffix| (rule, suffix)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrefixRule> {
        self.rules.iter()
    }
}
