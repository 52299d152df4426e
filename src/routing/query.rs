//! Query string reconstruction.
//!
//! Sources are tried in order and the first non-empty result is used; they
//! are never merged:
//! 1. raw query string (trimmed, verbatim)
//! 2. multi-value mapping, every value appended
//! 3. single-value mapping, later duplicates replace earlier ones in place
//!
//! Null and empty-string values are dropped from both mappings.

use url::form_urlencoded::Serializer;

use crate::http::request::{InboundRequest, MultiValueParams, SingleValueParams};

/// Resolve the query string to append to the upstream URL, without `?`.
pub fn resolve_query(req: &InboundRequest) -> String {
    if let Some(raw) = req.raw_query.as_deref().map(str::trim) {
        if !raw.is_empty() {
            return raw.to_string();
        }
    }

    if let Some(params) = &req.multi_value_query {
        let query = encode_multi_value(params);
        if !query.is_empty() {
            return query;
        }
    }

    if let Some(params) = &req.query {
        let query = encode_single_value(params);
        if !query.is_empty() {
            return query;
        }
    }

    String::new()
}

fn kept(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn encode_multi_value(params: &MultiValueParams) -> String {
    let mut out = Serializer::new(String::new());
    for (key, values) in params {
        for value in values.iter().filter_map(kept) {
            out.append_pair(key, value);
        }
    }
    out.finish()
}

fn encode_single_value(params: &SingleValueParams) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(params.len());
    for (key, value) in params {
        let Some(value) = kept(value) else {
            continue;
        };
        match pairs.iter_mut().find(|(k, _)| *k == key.as_str()) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key.as_str(), value)),
        }
    }
    Serializer::new(String::new()).extend_pairs(pairs).finish()
}
