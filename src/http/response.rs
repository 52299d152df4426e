//! Outbound response shaping.
//!
//! # Responsibilities
//! - Describe the response returned to the browser
//! - Add the permissive CORS and cache headers to relayed responses
//! - Render locally synthesized errors as JSON
//!
//! # Design Decisions
//! - Relayed bodies are bytes, never re-parsed
//! - Upstream headers other than `content-type` are not relayed

use axum::body::{Body, Bytes};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Content type used for local JSON bodies and as the relay fallback.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A response ready to hand back to the client.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundResponse {
    /// 204 answer to a CORS preflight.
    pub fn preflight() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        Self {
            status: StatusCode::NO_CONTENT,
            headers,
            body: Bytes::new(),
        }
    }

    /// Locally synthesized JSON body.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Self {
            status,
            headers,
            body: Bytes::from(value.to_string()),
        }
    }

    /// Upstream response relayed with CORS and no-store headers added.
    pub fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            content_type.unwrap_or_else(|| HeaderValue::from_static(JSON_CONTENT_TYPE)),
        );
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        Self {
            status,
            headers,
            body,
        }
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
