//! Forwarding handler.
//!
//! One invocation ends in exactly one of four outcomes:
//!
//! ```text
//! OPTIONS ─────────────────────────────▶ preflight-ok      (204)
//! resolve path ── rejected ────────────▶ bad-request       (400)
//!      │
//!      └─ forward ── answered ─────────▶ upstream-success  (upstream status)
//!                 └─ transport error ──▶ upstream-failure  (502)
//! ```
//!
//! `handle` never fails: every branch yields an `OutboundResponse`.

use std::fmt;
use std::time::Instant;

use axum::http::Method;

use crate::config::ProxyConfig;
use crate::http::request::InboundRequest;
use crate::http::response::OutboundResponse;
use crate::observability::metrics;
use crate::proxy::error::{PathDiagnostics, ProxyError};
use crate::proxy::upstream::{ClientError, UpstreamClient};
use crate::routing::{resolve_query, PathResolver, ResolvedTarget};

/// Terminal state of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PreflightOk,
    BadRequest,
    UpstreamSuccess,
    UpstreamFailure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::PreflightOk => "preflight-ok",
            Outcome::BadRequest => "bad-request",
            Outcome::UpstreamSuccess => "upstream-success",
            Outcome::UpstreamFailure => "upstream-failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves inbound requests and relays them to the upstream API.
#[derive(Debug, Clone)]
pub struct ForwardingHandler {
    resolver: PathResolver,
    upstream: UpstreamClient,
}

impl ForwardingHandler {
    pub fn new(resolver: PathResolver, upstream: UpstreamClient) -> Self {
        Self { resolver, upstream }
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ClientError> {
        Ok(Self::new(
            PathResolver::from_config(&config.routing),
            UpstreamClient::new(&config.upstream, &config.timeouts)?,
        ))
    }

    /// Resolve path and query into an upstream target.
    pub fn resolve(&self, req: &InboundRequest) -> Result<ResolvedTarget, ProxyError> {
        let query_string = resolve_query(req);
        match self.resolver.resolve(req) {
            Ok(upstream_path) => Ok(ResolvedTarget {
                upstream_path,
                query_string,
            }),
            Err(rejection) => Err(ProxyError::InvalidPath {
                reason: rejection.reason,
                got: PathDiagnostics {
                    path: req.path.clone(),
                    path_param: req.path_param.clone(),
                    original_path: self.resolver.original_path(req).map(str::to_string),
                    upstream_path: rejection.candidate,
                    query: query_string,
                },
            }),
        }
    }

    /// Handle one inbound request.
    pub async fn handle(&self, req: &InboundRequest) -> OutboundResponse {
        let start = Instant::now();
        let (outcome, response) = self.dispatch(req).await;

        metrics::record_request(
            req.method.as_str(),
            response.status.as_u16(),
            outcome.as_str(),
            start,
        );
        tracing::info!(
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            outcome = %outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        );

        response
    }

    async fn dispatch(&self, req: &InboundRequest) -> (Outcome, OutboundResponse) {
        if req.method == Method::OPTIONS {
            return (Outcome::PreflightOk, OutboundResponse::preflight());
        }

        let target = match self.resolve(req) {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(path = %req.path, error = %err, "Rejected path");
                return (Outcome::BadRequest, err.to_outbound());
            }
        };

        match self.forward(req.method.clone(), &target).await {
            Ok(response) => (Outcome::UpstreamSuccess, response),
            Err(err) => {
                tracing::error!(error = %err, "Upstream error");
                (Outcome::UpstreamFailure, err.to_outbound())
            }
        }
    }

    async fn forward(
        &self,
        method: Method,
        target: &ResolvedTarget,
    ) -> Result<OutboundResponse, ProxyError> {
        let url = target.url(self.upstream.base_url());
        tracing::debug!(method = %method, upstream_url = %url, "Forwarding request");

        match self.upstream.send(method, &url).await {
            Ok(answer) => Ok(OutboundResponse::relay(
                answer.status,
                answer.content_type,
                answer.body,
            )),
            Err(e) => Err(ProxyError::UpstreamTransport {
                details: error_chain(&e),
                url,
            }),
        }
    }
}

/// Flatten an error and its sources into one message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
