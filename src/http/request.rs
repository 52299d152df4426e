//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the client sent one
//! - Describe an inbound request independently of the hosting layer
//! - Extract routing-relevant information (path, query, headers) from axum
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `InboundRequest` carries every shape a hosting layer may deliver
//!   (path parameter, raw query, single/multi-value mappings); the axum
//!   adapter fills the ones it has

use axum::http::{request::Parts, HeaderName, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Ordered key → values mapping. Values may be null.
pub type MultiValueParams = Vec<(String, Vec<Option<String>>)>;

/// Ordered key → value mapping. Values may be null.
pub type SingleValueParams = Vec<(String, Option<String>)>;

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

/// Read the request ID previously assigned by the request ID layer.
pub fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// A single inbound request as delivered by the hosting layer.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    /// Primary request path.
    pub path: String,

    /// Explicit path parameter, when the hosting layer supplies one.
    pub path_param: Option<String>,

    /// Pre-encoded query string.
    pub raw_query: Option<String>,

    /// Multi-value query mapping.
    pub multi_value_query: Option<MultiValueParams>,

    /// Single-value query mapping.
    pub query: Option<SingleValueParams>,

    /// Headers keyed by lowercase name. Later duplicates are dropped.
    pub headers: Vec<(String, String)>,

    pub method: Method,
}

impl InboundRequest {
    /// Build a descriptor with only a method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    /// Describe an axum request.
    ///
    /// The raw query is carried verbatim; the multi-value mapping is decoded
    /// from the same query so that either source can drive resolution.
    pub fn from_parts(parts: &Parts) -> Self {
        let raw_query = parts.uri.query().map(str::to_string);
        let multi_value_query = raw_query.as_deref().map(decode_multi_value);

        let mut headers: Vec<(String, String)> = Vec::with_capacity(parts.headers.len());
        for (name, value) in &parts.headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            // HeaderName is always lowercase.
            if !headers.iter().any(|(n, _)| n == name.as_str()) {
                headers.push((name.as_str().to_string(), value.to_string()));
            }
        }

        Self {
            path: parts.uri.path().to_string(),
            path_param: None,
            raw_query,
            multi_value_query,
            query: None,
            headers,
            method: parts.method.clone(),
        }
    }

    /// Look up a header by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Decode a query string into an ordered multi-value mapping.
fn decode_multi_value(query: &str) -> MultiValueParams {
    let mut params: MultiValueParams = Vec::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(Some(value.into_owned())),
            None => params.push((key.into_owned(), vec![Some(value.into_owned())])),
        }
    }
    params
}
