//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Hold the pooled client and the fixed request headers
//! - Issue exactly one request per call, no retries
//! - Read the full body so transport failures surface before relaying
//!
//! # Design Decisions
//! - Connect and total timeouts enforced by the client; expiry is a
//!   transport failure like any other
//! - Inbound headers and bodies are never forwarded

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid value for upstream.{0}")]
    Header(&'static str),

    #[error("failed to build upstream client: {0}")]
    Build(#[from] reqwest::Error),
}

/// A fully read upstream answer.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Client for the configured upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, ClientError> {
        let accept =
            HeaderValue::from_str(&config.accept).map_err(|_| ClientError::Header("accept"))?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ClientError::Header("user_agent"))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, accept);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL every resolved path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one bodiless request and read the response.
    pub async fn send(&self, method: Method, url: &str) -> Result<UpstreamResponse, reqwest::Error> {
        let response = self.client.request(method, url).send().await?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
