//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work: unparseable addresses, non-HTTP upstream URLs, zero timeouts.
//! Every problem is reported, not just the first.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.url `{0}` is not a valid URL")]
    UpstreamUrl(String),

    #[error("upstream.url `{0}` must use http or https")]
    UpstreamScheme(String),

    #[error("upstream.field_name must not be empty")]
    EmptyFieldName,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("cors.allowed_origins entry `{0}` is not a valid header value")]
    CorsOrigin(String),

    #[error("limits.max_upload_bytes must be greater than zero")]
    ZeroUploadLimit,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed config, collecting all errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(_) => errors.push(ValidationError::UpstreamScheme(upstream.url.clone())),
        Err(_) => errors.push(ValidationError::UpstreamUrl(upstream.url.clone())),
    }

    if upstream.field_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFieldName);
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }
    if upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.request_timeout_secs"));
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::CorsOrigin(origin.clone()));
        }
    }

    if config.limits.max_upload_bytes == Some(0) {
        errors.push(ValidationError::ZeroUploadLimit);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
