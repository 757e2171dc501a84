//! Configuration loading from disk and the process environment.

use std::path::Path;
use std::fs;
use std::str::FromStr;
use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "PROXY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidEnv {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    prepare(read_file(path)?)
}

/// Load configuration the way the binary does at startup.
///
/// Defaults, then the TOML file named by `PROXY_CONFIG` if set, then
/// environment overrides. The result is validated.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            tracing::info!(path = %path, "Reading configuration file");
            read_file(Path::new(&path))?
        }
        _ => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, std::env::vars())?;
    prepare(config)
}

/// Normalize and validate a configuration assembled in code.
pub fn prepare(mut config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    normalize(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply recognised environment variables on top of `config`.
///
/// Unknown keys are ignored. Takes the variables explicitly so callers
/// (and tests) are not tied to the process environment.
pub fn apply_env_overrides<I, K, V>(config: &mut ProxyConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (key, value) in vars {
        let key = key.as_ref();
        let value: String = value.into();
        match key {
            "LISTEN_HOST" => config.listener.host = value,
            "LISTEN_PORT" => config.listener.port = parse(key, &value)?,
            "UPSTREAM_ORIGIN" => config.upstream.origin = value,
            "UPSTREAM_TIMEOUT_SECS" => config.upstream.timeout_secs = parse(key, &value)?,
            "UPSTREAM_CONNECT_TIMEOUT_SECS" => {
                config.upstream.connect_timeout_secs = parse(key, &value)?
            }
            "PATH_PREFIX" => config.routing.path_prefix = value,
            "ALLOWED_ORIGINS" => {
                config.cors.allowed_origins = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "HEALTH_MESSAGE" => config.health.message = value,
            "MAX_BODY_SIZE" => config.limits.max_body_size = parse(key, &value)?,
            "LOG_LEVEL" => config.observability.log_level = value,
            "LOG_FORMAT" => config.observability.log_format = parse::<LogFormat>(key, &value)?,
            "METRICS_ENABLED" => config.observability.metrics_enabled = parse(key, &value)?,
            "METRICS_ADDRESS" => config.observability.metrics_address = value,
            _ => {}
        }
    }
    Ok(())
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Trim trailing slashes so prefix stripping and URL joining never double up.
fn normalize(config: &mut ProxyConfig) {
    let origin = config.upstream.origin.trim().trim_end_matches('/');
    config.upstream.origin = origin.to_string();

    let prefix = config.routing.path_prefix.trim();
    let trimmed = prefix.trim_end_matches('/');
    // A bare "/" is left alone for validation to reject.
    config.routing.path_prefix = if trimmed.is_empty() { prefix } else { trimmed }.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_overrides_replace_defaults() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(
            &mut config,
            [
                ("LISTEN_PORT", "4000"),
                ("UPSTREAM_ORIGIN", "http://127.0.0.1:9999"),
                ("PATH_PREFIX", "/v1"),
                ("ALLOWED_ORIGINS", "https://a.example, https://b.example,,"),
                ("LOG_FORMAT", "JSON"),
                ("UNRELATED", "ignored"),
            ],
        )
        .unwrap();

        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.upstream.origin, "http://127.0.0.1:9999");
        assert_eq!(config.routing.path_prefix, "/v1");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut config = ProxyConfig::default();
        let err = apply_env_overrides(&mut config, [("LISTEN_PORT", "http")]).unwrap_err();
        match err {
            ConfigError::InvalidEnv { key, .. } => assert_eq!(key, "LISTEN_PORT"),
            other => panic!("unexpected error: {other}"),
        }

        let err = apply_env_overrides(&mut config, [("LISTEN_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn normalize_trims_trailing_slashes() {
        let mut config = ProxyConfig::default();
        config.upstream.origin = "http://example.com/base/".into();
        config.routing.path_prefix = "/api/".into();
        normalize(&mut config);
        assert_eq!(config.upstream.origin, "http://example.com/base");
        assert_eq!(config.routing.path_prefix, "/api");

        config.routing.path_prefix = "/".into();
        normalize(&mut config);
        assert_eq!(config.routing.path_prefix, "/");
    }

    #[test]
    fn load_config_reads_and_validates_file() {
        let path = std::env::temp_dir().join(format!("fwd-proxy-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[upstream]\norigin = \"http://127.0.0.1:7000/\"\n[listener]\nport = 0").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.upstream.origin, "http://127.0.0.1:7000");
        assert_eq!(config.listener.port, 0);

        fs::write(&path, "[listener]\nport = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unparsable_metrics_address_is_fatal() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(
            &mut config,
            [
                ("UPSTREAM_ORIGIN", "http://127.0.0.1:9999"),
                ("METRICS_ENABLED", "true"),
                ("METRICS_ADDRESS", "localhost"),
            ],
        )
        .unwrap();

        match prepare(config).unwrap_err() {
            ConfigError::Validation(errors) => assert_eq!(
                errors,
                vec![ValidationError::InvalidMetricsAddress("localhost".into())]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }
}
