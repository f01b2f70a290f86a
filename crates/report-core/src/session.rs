//! Per-session state: the ticker registry plus what the surface shows

use tracing::debug;

use crate::error::ValidationError;
use crate::pipeline::PipelineState;
use crate::presenter::{Presenter, TICKER_HINT, TICKER_PROMPT};
use crate::ticker::{Ticker, TickerRegistry};

/// Explicitly owned session, created at start-up and passed into every
/// pipeline operation.
#[derive(Debug, Default)]
pub struct Session {
    registry: TickerRegistry,
    state: PipelineState,
    report: Option<String>,
    show_hint: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a ticker.
    ///
    /// Success moves the session to `CollectingTickers` and clears any
    /// earlier hint; failure leaves the registry untouched and switches the
    /// input label to [`TICKER_HINT`].
    pub fn submit(&mut self, raw: &str) -> Result<Ticker, ValidationError> {
        match self.registry.submit(raw) {
            Ok(ticker) => {
                debug!(%ticker, total = self.registry.len(), "ticker registered");
                self.show_hint = false;
                self.state = PipelineState::CollectingTickers;
                Ok(ticker)
            }
            Err(err) => {
                debug!(error = %err, "ticker rejected");
                self.show_hint = true;
                Err(err)
            }
        }
    }

    /// [`Session::submit`], then render the outcome
    pub fn submit_and_render(
        &mut self,
        raw: &str,
        presenter: &mut dyn Presenter,
    ) -> Result<Ticker, ValidationError> {
        let result = self.submit(raw);
        match &result {
            Ok(_) => presenter.render_tickers(self.tickers()),
            Err(_) => presenter.render_error(TICKER_HINT),
        }
        result
    }

    /// Whether report generation may be triggered
    pub fn can_generate(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Text for the ticker input label
    pub fn input_hint(&self) -> &'static str {
        if self.show_hint {
            TICKER_HINT
        } else {
            TICKER_PROMPT
        }
    }

    pub fn tickers(&self) -> &[Ticker] {
        self.registry.list()
    }

    pub fn registry(&self) -> &TickerRegistry {
        &self.registry
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Most recent report, if a run has succeeded
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Generation was refused for lack of tickers
    pub(crate) fn reject_generate(&mut self) {
        self.show_hint = true;
    }

    pub(crate) fn set_state(&mut self, state: PipelineState) {
        self.state = state;
    }

    pub(crate) fn replace_report(&mut self, report: String) {
        self.report = Some(report);
    }
}
