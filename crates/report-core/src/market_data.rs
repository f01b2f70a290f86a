//! Market-data gateway: one price-history request per ticker

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ReportConfig, parse_base_url};
use crate::error::{ConfigError, FetchError};
use crate::range::DateRange;
use crate::ticker::Ticker;

/// Unparsed price-history body for one ticker
pub type PriceSeriesRaw = String;

/// Source of raw daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Fetch the price history of `ticker` over `range`.
    ///
    /// The body is returned as-is; interpreting it is left to the report
    /// model. Implementations do not retry.
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeriesRaw, FetchError>;
}

/// `GET {base}/api/agg/{ticker}?start=..&end=..` over HTTP
#[derive(Debug, Clone)]
pub struct HttpMarketDataGateway {
    client: Client,
    base: Url,
}

impl HttpMarketDataGateway {
    /// Create a gateway against `api_base` with an optional per-request timeout
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let base = parse_base_url(api_base)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self, ConfigError> {
        Self::new(&config.api_base, config.market_data_timeout)
    }

    fn series_url(&self, ticker: &Ticker, range: &DateRange) -> Url {
        let mut url = self.base.clone();
        // base was checked to be a base URL in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "agg", ticker.as_str()]);
        }
        url.query_pairs_mut()
            .append_pair("start", &range.start_param())
            .append_pair("end", &range.end_param());
        url
    }
}

#[async_trait]
impl MarketDataGateway for HttpMarketDataGateway {
    #[instrument(skip(self, range), fields(ticker = %ticker))]
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeriesRaw, FetchError> {
        let url = self.series_url(ticker, range);
        debug!("Fetching price history from {}", url);

        let unavailable = |reason: String| FetchError::Unavailable {
            ticker: ticker.clone(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        debug!("Received {} bytes", body.len());
        Ok(body)
    }
}
