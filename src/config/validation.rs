//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream origin is a usable base URL
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Reject CORS settings browsers would refuse with credentials
//! - Check the metrics listener address when the exporter is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream.origin is required")]
    MissingUpstream,

    #[error("upstream.origin '{origin}' is not a valid URL: {reason}")]
    InvalidUpstream { origin: String, reason: String },

    #[error("routing.path_prefix '{0}' must start with '/' and must not be '/'")]
    InvalidPathPrefix(String),

    #[error("cors.allowed_origins entry '{0}' is not a valid origin")]
    InvalidOrigin(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_upstream_origin(&config.upstream.origin) {
        errors.push(e);
    }

    let prefix = &config.routing.path_prefix;
    if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
    }

    for origin in &config.cors.allowed_origins {
        // Browsers reject a wildcard grant on credentialed requests.
        if origin == "*" || HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.timeout_secs"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.connect_timeout_secs"));
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero("limits.max_body_size"));
    }

    let metrics_address = &config.observability.metrics_address;
    if config.observability.metrics_enabled && metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream_origin(origin: &str) -> Result<(), ValidationError> {
    if origin.trim().is_empty() {
        return Err(ValidationError::MissingUpstream);
    }

    let invalid = |reason: &str| ValidationError::InvalidUpstream {
        origin: origin.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.upstream.origin = "https://api.example.com".into();
        config
    }

    #[test]
    fn accepts_defaults_with_upstream() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn missing_upstream_is_rejected() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingUpstream]);
    }

    #[test]
    fn rejects_non_http_upstream() {
        let mut config = valid();
        config.upstream.origin = "ftp://files.example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidUpstream { .. }));

        config.upstream.origin = "not a url".into();
        assert!(validate_config(&config).is_err());

        config.upstream.origin = "http://example.com/?a=b".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn collects_every_error() {
        let mut config = valid();
        config.routing.path_prefix = "/".into();
        config.cors.allowed_origins = vec!["*".into()];
        config.upstream.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvalidPathPrefix("/".into())));
        assert!(errors.contains(&ValidationError::InvalidOrigin("*".into())));
        assert!(errors.contains(&ValidationError::Zero("upstream.timeout_secs")));
    }

    #[test]
    fn prefix_must_be_absolute() {
        let mut config = valid();
        config.routing.path_prefix = "api".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn enabled_metrics_need_a_socket_address() {
        let mut config = valid();
        config.observability.metrics_address = "metrics.local".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidMetricsAddress("metrics.local".into())]
        );

        config.observability.metrics_address = "127.0.0.1:9464".into();
        assert!(validate_config(&config).is_ok());
    }
}
