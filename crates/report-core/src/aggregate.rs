//! Concurrent fan-out of market-data fetches with an all-or-nothing join

use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{FetchError, PipelineError};
use crate::market_data::MarketDataGateway;
use crate::range::DateRange;
use crate::ticker::Ticker;

/// Every ticker's price history, concatenated in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedPayload(String);

impl AggregatedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for AggregatedPayload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AggregatedPayload {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AggregatedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fetches all tickers at once and joins the bodies
pub struct AggregationFetcher {
    gateway: Arc<dyn MarketDataGateway>,
}

impl AggregationFetcher {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch every ticker concurrently and concatenate the bodies.
    ///
    /// All requests are in flight at the same time. The output follows the
    /// order of `tickers`, not completion order. The first failure resolves
    /// the whole join with `AggregationFailed` and the remaining fetches are
    /// dropped, so no partial payload is ever returned.
    #[instrument(skip_all, fields(tickers = tickers.len(), start = %range.start(), end = %range.end()))]
    pub async fn collect_all(
        &self,
        tickers: &[Ticker],
        range: &DateRange,
    ) -> Result<AggregatedPayload, PipelineError> {
        let gateway = &self.gateway;
        let fetches = tickers.iter().map(|ticker| async move {
            let body = gateway.fetch_series(ticker, range).await?;
            debug!(%ticker, bytes = body.len(), "price history received");
            Ok::<_, FetchError>(body)
        });

        let bodies = try_join_all(fetches).await.map_err(|cause| {
            warn!(ticker = %cause.ticker(), error = %cause, "aggregation aborted");
            PipelineError::AggregationFailed { cause }
        })?;

        let payload = AggregatedPayload(bodies.concat());
        info!(bytes = payload.len(), "aggregated price history");
        Ok(payload)
    }
}
