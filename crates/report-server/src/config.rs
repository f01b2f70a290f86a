//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, ServerError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_POLYGON_BASE: &str = "https://api.polygon.io";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 1.1;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Configuration for the report server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:3001)
    pub bind_addr: SocketAddr,

    /// Polygon API key, appended to every aggregates request
    pub polygon_api_key: String,

    /// Polygon base URL
    pub polygon_base: String,

    /// Timeout for Polygon requests; `None` disables it
    pub upstream_timeout: Option<Duration>,

    /// API key for the completion provider
    pub openai_api_key: String,

    /// Base URL of an OpenAI-compatible API; provider default when unset
    pub openai_api_base: Option<String>,

    /// Model used for reports
    pub model: String,

    /// Sampling temperature used for reports
    pub temperature: f32,
}

impl ServerConfig {
    /// Config with both API keys and defaults for everything else
    pub fn new(polygon_api_key: impl Into<String>, openai_api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            polygon_api_key: polygon_api_key.into(),
            polygon_base: DEFAULT_POLYGON_BASE.to_string(),
            upstream_timeout: Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)),
            openai_api_key: openai_api_key.into(),
            openai_api_base: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Load configuration from the process environment
    ///
    /// | Variable | Field | Default |
    /// |---|---|---|
    /// | `POLYGON_API_KEY` | `polygon_api_key` | required |
    /// | `OPENAI_API_KEY` | `openai_api_key` | required |
    /// | `OPENAI_API_BASE` | `openai_api_base` | provider default |
    /// | `POLYGON_API_BASE` | `polygon_base` | `https://api.polygon.io` |
    /// | `REPORT_MODEL` | `model` | `gpt-4o-mini` |
    /// | `REPORT_TEMPERATURE` | `temperature` | `1.1` |
    /// | `REPORT_SERVER_ADDR` | `bind_addr` | `0.0.0.0:3001` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ServerError::MissingEnv(key))
        };

        let mut config = Self::new(required("POLYGON_API_KEY")?, required("OPENAI_API_KEY")?);

        config.openai_api_base = lookup("OPENAI_API_BASE");
        if let Some(base) = lookup("POLYGON_API_BASE") {
            config.polygon_base = base;
        }
        if let Some(model) = lookup("REPORT_MODEL") {
            config.model = model;
        }
        if let Some(temperature) = lookup("REPORT_TEMPERATURE") {
            config.temperature = parse_env("REPORT_TEMPERATURE", &temperature)?;
        }
        config.bind_addr = parse_env(
            "REPORT_SERVER_ADDR",
            &lookup("REPORT_SERVER_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ServerError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("POLYGON_API_KEY", "pk"), ("OPENAI_API_KEY", "ok")]))
                .unwrap();

        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 1.1).abs() < f32::EPSILON);
        assert_eq!(config.polygon_base, "https://api.polygon.io");
        assert_eq!(config.openai_api_base, None);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("POLYGON_API_KEY", "pk"),
            ("OPENAI_API_KEY", "ok"),
            ("OPENAI_API_BASE", "http://localhost:1234/v1"),
            ("REPORT_MODEL", "local-model"),
            ("REPORT_TEMPERATURE", "0.7"),
            ("REPORT_SERVER_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.model, "local-model");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.openai_api_base.as_deref(),
            Some("http://localhost:1234/v1")
        );
    }

    #[test]
    fn test_missing_keys() {
        let err = ServerConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "ok")])).unwrap_err();
        assert!(matches!(err, ServerError::MissingEnv("POLYGON_API_KEY")));

        let err =
            ServerConfig::from_lookup(lookup(&[("POLYGON_API_KEY", "pk"), ("OPENAI_API_KEY", " ")]))
                .unwrap_err();
        assert!(matches!(err, ServerError::MissingEnv("OPENAI_API_KEY")));
    }

    #[test]
    fn test_invalid_temperature() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("POLYGON_API_KEY", "pk"),
            ("OPENAI_API_KEY", "ok"),
            ("REPORT_TEMPERATURE", "warm"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid value for REPORT_TEMPERATURE: 'warm'");
    }
}
