//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Inbound request deadline must exceed the upstream deadline
//! - Check the upstream base URL and the accepted prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.base_url: {0}")]
    InvalidUpstream(String),

    #[error("routing.prefixes: at least one prefix is required")]
    NoPrefixes,

    #[error("routing.prefixes: {0:?} must start and end with '/'")]
    InvalidPrefix(String),

    #[error("{0}: must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs ({request}) must exceed timeouts.upstream_secs ({upstream})")]
    RequestTimeoutTooShort { request: u64, upstream: u64 },
}

/// Check a configuration, collecting every problem.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Err(e) = check_base_url(&config.upstream.base_url) {
        errors.push(e);
    }

    if config.routing.prefixes.is_empty() {
        errors.push(ValidationError::NoPrefixes);
    }
    for prefix in &config.routing.prefixes {
        if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }
    let (request, upstream) = (config.timeouts.request_secs, config.timeouts.upstream_secs);
    if request > 0 && upstream > 0 && request <= upstream {
        errors.push(ValidationError::RequestTimeoutTooShort { request, upstream });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUpstream(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUpstream(format!(
            "unsupported scheme {:?}",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::InvalidUpstream(
            "must not carry a query or fragment".to_string(),
        ));
    }
    if !raw.ends_with('/') {
        return Err(ValidationError::InvalidUpstream(
            "must end with '/'".to_string(),
        ));
    }
    Ok(())
}
