//! Error types for the report pipeline

use chrono::NaiveDate;
use thiserror::Error;

use crate::ticker::{MIN_TICKER_LEN, Ticker};

/// Result type alias for pipeline operations
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Rejected ticker input. Never leaves the registry/session layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Normalized input is shorter than the minimum ticker length
    #[error(
        "ticker '{normalized}' is too short, need at least {min} characters",
        min = MIN_TICKER_LEN
    )]
    TooShort { normalized: String },
}

/// A single market-data fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Provider answered with a non-success status or could not be reached
    #[error("price history unavailable for {ticker}: {reason}")]
    Unavailable { ticker: Ticker, reason: String },
}

impl FetchError {
    /// Ticker whose fetch failed
    pub fn ticker(&self) -> &Ticker {
        match self {
            FetchError::Unavailable { ticker, .. } => ticker,
        }
    }
}

/// Failure of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Generation was triggered with an empty registry
    #[error("no tickers registered")]
    NoTickers,

    /// At least one per-ticker fetch failed; no payload was produced
    #[error("failed to aggregate price data")]
    AggregationFailed {
        #[source]
        cause: FetchError,
    },

    /// The report endpoint could not produce a report
    #[error("report generation failed: {reason}")]
    ReportFailed { reason: String },
}

impl PipelineError {
    pub(crate) fn report_failed(reason: impl Into<String>) -> Self {
        PipelineError::ReportFailed {
            reason: reason.into(),
        }
    }
}

/// Invalid configuration or run parameters
#[derive(Debug, Error)]
pub enum ConfigError {
    /// API base is not an absolute http(s) URL
    #[error("invalid API base '{url}': {reason}")]
    InvalidApiBase { url: String, reason: String },

    /// Lookback window of zero days
    #[error("lookback window must be at least one day")]
    ZeroLookback,

    /// Start date after end date
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Environment variable could not be parsed
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
