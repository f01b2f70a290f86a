//! End-to-end run: fetch → assemble → generate → present

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::aggregate::AggregationFetcher;
use crate::config::ReportConfig;
use crate::error::{ConfigError, PipelineError};
use crate::market_data::{HttpMarketDataGateway, MarketDataGateway};
use crate::presenter::{
    FETCH_FAILED_MESSAGE, PipelineEvent, Presenter, REPORT_FAILED_MESSAGE, TICKER_HINT,
};
use crate::range::DateRange;
use crate::report::{HttpReportGateway, ReportGateway, ReportResult};
use crate::session::Session;

/// Observable pipeline state; exactly one is active at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing registered yet
    #[default]
    Idle,
    /// Tickers are being added
    CollectingTickers,
    /// Price history requests are in flight
    FetchingData,
    /// The report request is in flight
    GeneratingReport,
    /// A report is on screen
    Presenting,
    /// The last run failed
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::CollectingTickers => "collecting-tickers",
            PipelineState::FetchingData => "fetching-data",
            PipelineState::GeneratingReport => "generating-report",
            PipelineState::Presenting => "presenting",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl PipelineError {
    /// Generic message shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::NoTickers => TICKER_HINT,
            PipelineError::AggregationFailed { .. } => FETCH_FAILED_MESSAGE,
            PipelineError::ReportFailed { .. } => REPORT_FAILED_MESSAGE,
        }
    }
}

/// Drives a report run over a [`Session`].
///
/// Each run reads the session's current tickers, so after a failure the same
/// registry can simply be run again. Nothing is retried automatically.
pub struct PipelineController {
    fetcher: AggregationFetcher,
    reporter: Arc<dyn ReportGateway>,
}

impl PipelineController {
    pub fn new(market_data: Arc<dyn MarketDataGateway>, reporter: Arc<dyn ReportGateway>) -> Self {
        Self {
            fetcher: AggregationFetcher::new(market_data),
            reporter,
        }
    }

    /// Controller with HTTP gateways against `config.api_base`
    pub fn from_config(config: &ReportConfig) -> Result<Self, ConfigError> {
        let market_data = HttpMarketDataGateway::from_config(config)?;
        let reporter = HttpReportGateway::from_config(config)?;
        Ok(Self::new(Arc::new(market_data), Arc::new(reporter)))
    }

    /// Run the pipeline once for the session's tickers.
    ///
    /// Rejected with [`PipelineError::NoTickers`] (state unchanged) while the
    /// registry is empty. Every other failure moves the session to
    /// `Failed`, is logged, and is rendered with a generic message.
    #[instrument(skip_all, fields(tickers = session.tickers().len(), start = %range.start(), end = %range.end()))]
    pub async fn run(
        &self,
        session: &mut Session,
        range: &DateRange,
        presenter: &mut dyn Presenter,
    ) -> Result<ReportResult, PipelineError> {
        if !session.can_generate() {
            warn!("report requested with no tickers registered");
            session.reject_generate();
            presenter.render_error(TICKER_HINT);
            return Err(PipelineError::NoTickers);
        }

        let tickers = session.tickers().to_vec();
        info!(
            "generating report for {}",
            tickers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self::emit(
            session,
            presenter,
            PipelineEvent::FetchStarted {
                tickers: tickers.clone(),
            },
        );
        let payload = match self.fetcher.collect_all(&tickers, range).await {
            Ok(payload) => payload,
            Err(err) => return Err(Self::fail(session, presenter, err)),
        };

        Self::emit(session, presenter, PipelineEvent::ReportStarted);
        let report = match self.reporter.generate(&payload).await {
            Ok(report) => report,
            Err(err) => return Err(Self::fail(session, presenter, err)),
        };

        session.replace_report(report.clone());
        Self::emit(
            session,
            presenter,
            PipelineEvent::ReportReady {
                report: report.clone(),
            },
        );
        info!("report ready");
        Ok(report)
    }

    fn emit(session: &mut Session, presenter: &mut dyn Presenter, event: PipelineEvent) {
        let next = event.state();
        debug!(from = %session.state(), to = %next, "pipeline transition");
        session.set_state(next);
        presenter.on_event(&event);
    }

    fn fail(
        session: &mut Session,
        presenter: &mut dyn Presenter,
        err: PipelineError,
    ) -> PipelineError {
        if let PipelineError::AggregationFailed { cause } = &err {
            error!(error = %err, %cause, "pipeline run failed");
        } else {
            error!(error = %err, "pipeline run failed");
        }
        Self::emit(
            session,
            presenter,
            PipelineEvent::Failed {
                message: err.user_message(),
            },
        );
        err
    }
}
