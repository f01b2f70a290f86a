//! Pipeline events and the presentation adapter they are rendered through

use crate::pipeline::PipelineState;
use crate::ticker::Ticker;

/// Prompt shown next to the ticker input
pub const TICKER_PROMPT: &str = "Enter stock ticker symbol (e.g., TSLA, AAPL, META)";
/// Shown when a submitted ticker is too short, or generation is triggered with none
pub const TICKER_HINT: &str = "You must add at least one ticker (3+ letters, e.g. TSLA for Tesla).";
/// Progress while price history is being fetched
pub const FETCHING_MESSAGE: &str = "Fetching stock data...";
/// Progress while the report is being generated
pub const GENERATING_MESSAGE: &str = "Creating AI-powered report...";
/// Aggregation failed
pub const FETCH_FAILED_MESSAGE: &str = "There was an error fetching stock data. Please try again.";
/// Report request failed
pub const REPORT_FAILED_MESSAGE: &str = "Unable to access AI. Please refresh and try again.";

/// A state transition of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Price history is being fetched for these tickers
    FetchStarted { tickers: Vec<Ticker> },
    /// Aggregation succeeded and the report was requested
    ReportStarted,
    /// The report is ready and replaces any previous one
    ReportReady { report: String },
    /// The run failed; `message` is safe to show to the user
    Failed { message: &'static str },
}

impl PipelineEvent {
    /// State the pipeline is in once this event has been emitted
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineEvent::FetchStarted { .. } => PipelineState::FetchingData,
            PipelineEvent::ReportStarted => PipelineState::GeneratingReport,
            PipelineEvent::ReportReady { .. } => PipelineState::Presenting,
            PipelineEvent::Failed { .. } => PipelineState::Failed,
        }
    }
}

/// Rendering surface for the pipeline
///
/// The pipeline never touches a surface directly; it emits [`PipelineEvent`]s
/// and the default [`Presenter::on_event`] maps them onto these calls.
pub trait Presenter {
    /// Show the current ticker list
    fn render_tickers(&mut self, tickers: &[Ticker]);

    /// Show progress text (replaces the input form while a run is active)
    fn render_progress(&mut self, message: &str);

    /// Show a finished report, replacing any previous one
    fn render_report(&mut self, report: &str);

    /// Show a user-facing error message
    fn render_error(&mut self, message: &str);

    /// Map a pipeline event onto the render calls
    fn on_event(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::FetchStarted { .. } => self.render_progress(FETCHING_MESSAGE),
            PipelineEvent::ReportStarted => self.render_progress(GENERATING_MESSAGE),
            PipelineEvent::ReportReady { report } => self.render_report(report),
            PipelineEvent::Failed { message } => self.render_error(message),
        }
    }
}
