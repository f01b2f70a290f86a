//! Stock report pipeline
//!
//! Turns a list of ticker symbols into a short AI-written trading report:
//!
//! - Ticker intake with validation (`Ticker`, `TickerRegistry`, `Session`)
//! - Concurrent price-history fetches joined all-or-nothing (`AggregationFetcher`)
//! - Prompt assembly with fixed instructions and style examples (`ReportPrompt`)
//! - Report generation through the report endpoint (`ReportGateway`)
//! - Progress and results surfaced as `PipelineEvent`s through a `Presenter`
//!
//! # Example
//!
//! ```rust,ignore
//! use report_core::{DateRange, PipelineController, ReportConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ReportConfig::from_env()?;
//!     let controller = PipelineController::from_config(&config)?;
//!
//!     let mut session = Session::new();
//!     session.submit("tsla")?;
//!     session.submit("aapl")?;
//!
//!     let range = DateRange::recent(config.lookback_days)?;
//!     let report = controller.run(&mut session, &range, &mut presenter).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod market_data;
pub mod pipeline;
pub mod presenter;
pub mod prompt;
pub mod range;
pub mod report;
pub mod session;
pub mod ticker;

pub use aggregate::{AggregatedPayload, AggregationFetcher};
pub use config::{ReportConfig, ReportConfigBuilder};
pub use error::{ConfigError, FetchError, PipelineError, Result, ValidationError};
pub use market_data::{HttpMarketDataGateway, MarketDataGateway, PriceSeriesRaw};
pub use pipeline::{PipelineController, PipelineState};
pub use presenter::{PipelineEvent, Presenter};
pub use prompt::ReportPrompt;
pub use range::DateRange;
pub use report::{HttpReportGateway, ReportGateway, ReportResult};
pub use session::Session;
pub use ticker::{MIN_TICKER_LEN, Ticker, TickerRegistry};
