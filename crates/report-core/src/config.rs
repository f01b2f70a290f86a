//! Configuration for the report pipeline

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Configuration for the pipeline's HTTP gateways and date window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Base URL of the backend serving `/api/agg` and `/api/report`
    pub api_base: String,

    /// Number of trailing days of price history to request
    pub lookback_days: u32,

    /// Per-request timeout for market-data fetches (`None` waits forever)
    pub market_data_timeout: Option<Duration>,

    /// Per-request timeout for the report request (`None` waits forever)
    pub report_timeout: Option<Duration>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            lookback_days: 3,
            market_data_timeout: Some(Duration::from_secs(30)),
            report_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Load overrides from the process environment
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `STOCK_REPORT_API_BASE` | `api_base` |
    /// | `STOCK_REPORT_LOOKBACK_DAYS` | `lookback_days` |
    /// | `STOCK_REPORT_FETCH_TIMEOUT_SECS` | `market_data_timeout` (0 disables) |
    /// | `STOCK_REPORT_REPORT_TIMEOUT_SECS` | `report_timeout` (0 disables) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReportConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(api_base) = lookup("STOCK_REPORT_API_BASE") {
            builder = builder.api_base(api_base);
        }
        if let Some(days) = lookup("STOCK_REPORT_LOOKBACK_DAYS") {
            builder = builder.lookback_days(parse_env("STOCK_REPORT_LOOKBACK_DAYS", &days)?);
        }
        if let Some(secs) = lookup("STOCK_REPORT_FETCH_TIMEOUT_SECS") {
            builder = builder
                .market_data_timeout(timeout_from_secs(parse_env("STOCK_REPORT_FETCH_TIMEOUT_SECS", &secs)?));
        }
        if let Some(secs) = lookup("STOCK_REPORT_REPORT_TIMEOUT_SECS") {
            builder = builder
                .report_timeout(timeout_from_secs(parse_env("STOCK_REPORT_REPORT_TIMEOUT_SECS", &secs)?));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;

        if self.lookback_days == 0 {
            return Err(ConfigError::ZeroLookback);
        }

        Ok(())
    }

    /// Parsed `api_base`
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.api_base)
    }
}

/// Parse and check a backend base URL
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidApiBase {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base"));
    }
    Ok(url)
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Builder for ReportConfig
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    api_base: Option<String>,
    lookback_days: Option<u32>,
    market_data_timeout: Option<Option<Duration>>,
    report_timeout: Option<Option<Duration>>,
}

impl ReportConfigBuilder {
    /// Set the backend base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the number of trailing days to fetch
    pub fn lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = Some(days);
        self
    }

    /// Set the market-data request timeout, `None` to disable
    pub fn market_data_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.market_data_timeout = Some(timeout);
        self
    }

    /// Set the report request timeout, `None` to disable
    pub fn report_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.report_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReportConfig, ConfigError> {
        let defaults = ReportConfig::default();

        let config = ReportConfig {
            api_base: self.api_base.unwrap_or(defaults.api_base),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            market_data_timeout: self
                .market_data_timeout
                .unwrap_or(defaults.market_data_timeout),
            report_timeout: self.report_timeout.unwrap_or(defaults.report_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
