//! Proxy error taxonomy.
//!
//! Upstream non-2xx answers are not errors: they are relayed as-is.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::http::response::OutboundResponse;
use crate::routing::RejectReason;

/// Echo of the path sources inspected during a failed resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDiagnostics {
    pub path: String,
    pub path_param: Option<String>,
    pub original_path: Option<String>,
    pub upstream_path: String,
    pub query: String,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid path: {reason}")]
    InvalidPath {
        reason: RejectReason,
        got: PathDiagnostics,
    },

    #[error("upstream fetch failed for {url}: {details}")]
    UpstreamTransport { details: String, url: String },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamTransport { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Render as a JSON error response.
    pub fn to_outbound(&self) -> OutboundResponse {
        let body = match self {
            ProxyError::InvalidPath { got, .. } => json!({
                "error": "Invalid path",
                "got": got,
            }),
            ProxyError::UpstreamTransport { details, url } => json!({
                "error": "Upstream fetch failed",
                "details": details,
                "url": url,
            }),
        };
        OutboundResponse::json(self.status(), &body)
    }
}
