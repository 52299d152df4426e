//! Upstream path resolution.
//!
//! # Responsibilities
//! - Walk the rule list and take the first (source, prefix) match
//! - Normalize the suffix (strip leading slashes)
//! - Reject empty and traversal-bearing paths
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The first match is final: an empty suffix fails even if a later rule
//!   would have produced a non-empty one
//! - The traversal guard is a substring check on the literal path, so `a..b`
//!   is rejected too. Percent-encoded dots are only rejected when a whole
//!   segment decodes to `..`, since the upstream client's URL parser
//!   normalizes exactly those segments

use std::fmt;

use crate::config::RoutingConfig;
use crate::http::request::InboundRequest;
use crate::routing::matcher::ResolverRules;

/// Why an inbound request could not be mapped to an upstream path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoMatchingPrefix,
    EmptyPath,
    Traversal,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoMatchingPrefix => write!(f, "no known prefix matched"),
            RejectReason::EmptyPath => write!(f, "resolved path is empty"),
            RejectReason::Traversal => write!(f, "resolved path contains '..'"),
        }
    }
}

/// A failed resolution together with the normalized candidate, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRejection {
    pub reason: RejectReason,
    pub candidate: String,
}

/// Maps inbound requests onto upstream paths.
#[derive(Debug, Clone)]
pub struct PathResolver {
    rules: ResolverRules,
}

impl PathResolver {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            rules: ResolverRules::from_config(config),
        }
    }

    /// Resolve the upstream path for a request.
    pub fn resolve(&self, req: &InboundRequest) -> Result<String, PathRejection> {
        let Some((rule, suffix)) = self.rules.first_match(req) else {
            return Err(PathRejection {
                reason: RejectReason::NoMatchingPrefix,
                candidate: String::new(),
            });
        };

        let upstream_path = suffix.trim_start_matches('/').to_string();
        tracing::trace!(
            source = ?rule.source,
            prefix = %rule.prefix,
            upstream_path = %upstream_path,
            "Path rule matched"
        );

        validate_path(upstream_path)
    }

    /// First original-path header value present on the request.
    pub fn original_path<'a>(&self, req: &'a InboundRequest) -> Option<&'a str> {
        self.rules.header_names().find_map(|name| req.header(name))
    }
}

/// Reject empty paths, any literal `..`, and encoded dot-dot segments.
fn validate_path(upstream_path: String) -> Result<String, PathRejection> {
    let reason = if upstream_path.is_empty() {
        RejectReason::EmptyPath
    } else if has_traversal(&upstream_path) {
        RejectReason::Traversal
    } else {
        return Ok(upstream_path);
    };
    Err(PathRejection {
        reason,
        candidate: upstream_path,
    })
}

fn has_traversal(path: &str) -> bool {
    path.contains("..")
        || path
            .split('/')
            .any(|segment| segment.to_ascii_lowercase().replace("%2e", ".") == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn resolver() -> PathResolver {
        PathResolver::from_config(&RoutingConfig::default())
    }

    fn get(path: &str) -> InboundRequest {
        InboundRequest::new(Method::GET, path)
    }

    #[test]
    fn test_each_prefix_resolves() {
        let r = resolver();
        for path in [
            "/.netlify/functions/pncp/orgaos/123/contratos",
            "/api/consulta/v1/orgaos/123/contratos",
            "/pncp/orgaos/123/contratos",
        ] {
            assert_eq!(r.resolve(&get(path)).unwrap(), "orgaos/123/contratos", "{path}");
        }
    }

    #[test]
    fn test_leading_slashes_stripped() {
        assert_eq!(
            resolver().resolve(&get("/api/consulta/v1///contratacoes/publicacao")),
            Ok("contratacoes/publicacao".to_string())
        );
    }

    #[test]
    fn test_unknown_prefix() {
        let err = resolver().resolve(&get("/api/consulta/v2/orgaos")).unwrap_err();
        assert_eq!(err.reason, RejectReason::NoMatchingPrefix);
    }

    #[test]
    fn test_bare_prefix_is_empty() {
        let err = resolver().resolve(&get("/api/consulta/v1/")).unwrap_err();
        assert_eq!(err.reason, RejectReason::EmptyPath);

        let err = resolver().resolve(&get("/pncp///")).unwrap_err();
        assert_eq!(err.reason, RejectReason::EmptyPath);
    }

    #[test]
    fn test_traversal_rejected_anywhere() {
        for path in [
            "/api/consulta/v1/../secret",
            "/api/consulta/v1/orgaos/../../etc",
            "/api/consulta/v1/orgaos/a..b",
            "/pncp/..",
            "/pncp/%2E%2E/%2e%2e/admin",
            "/pncp/orgaos/.%2e/x",
        ] {
            let err = resolver().resolve(&get(path)).unwrap_err();
            assert_eq!(err.reason, RejectReason::Traversal, "{path}");
        }
    }

    #[test]
    fn test_encoded_dots_inside_segment_allowed() {
        for (path, expected) in [
            ("/pncp/orgaos/a%2E%2Eb", "orgaos/a%2E%2Eb"),
            ("/pncp/orgaos/%2e%2e.json", "orgaos/%2e%2e.json"),
            ("/pncp/arquivos/%2e/x", "arquivos/%2e/x"),
        ] {
            assert_eq!(resolver().resolve(&get(path)), Ok(expected.to_string()), "{path}");
        }
    }

    #[test]
    fn test_single_dots_allowed() {
        assert_eq!(
            resolver().resolve(&get("/pncp/arquivos/v1.2/file.json")),
            Ok("arquivos/v1.2/file.json".to_string())
        );
    }

    #[test]
    fn test_path_param_beats_request_path() {
        let mut req = get("/api/consulta/v1/from-path");
        req.path_param = Some("/pncp/from-param".into());
        assert_eq!(resolver().resolve(&req), Ok("from-param".to_string()));
    }

    #[test]
    fn test_path_param_without_prefix_falls_through() {
        let mut req = get("/api/consulta/v1/from-path");
        req.path_param = Some("from-param".into());
        assert_eq!(resolver().resolve(&req), Ok("from-path".to_string()));
    }

    #[test]
    fn test_header_fallback() {
        let mut req = get("/.netlify/functions/other");
        req.headers
            .push(("x-original-uri".into(), "/api/consulta/v1/atas".into()));
        req.headers
            .push(("x-original-url".into(), "/api/consulta/v1/pca".into()));
        // x-original-url is listed before x-original-uri.
        assert_eq!(resolver().resolve(&req), Ok("pca".to_string()));
        assert_eq!(resolver().original_path(&req), Some("/api/consulta/v1/pca"));
    }

    #[test]
    fn test_first_match_is_final() {
        let mut req = get("/api/consulta/v1/");
        req.headers
            .push(("x-nf-original-path".into(), "/api/consulta/v1/orgaos".into()));
        let err = resolver().resolve(&req).unwrap_err();
        assert_eq!(err.reason, RejectReason::EmptyPath);
    }

    #[test]
    fn test_prefix_order_decides() {
        let config = RoutingConfig {
            prefixes: vec!["/pncp/".into(), "/pncp/v2/".into()],
            original_path_headers: vec![],
        };
        let r = PathResolver::from_config(&config);
        assert_eq!(r.resolve(&get("/pncp/v2/orgaos")), Ok("v2/orgaos".to_string()));
    }

    #[test]
    fn test_round_trip_url() {
        let path = resolver()
            .resolve(&get("/api/consulta/v1/orgaos/123/contratos"))
            .unwrap();
        assert_eq!(
            format!("https://pncp.gov.br/api/consulta/v1/{path}"),
            "https://pncp.gov.br/api/consulta/v1/orgaos/123/contratos"
        );
    }
}
