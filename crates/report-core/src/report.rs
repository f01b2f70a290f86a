//! Report gateway: one completion request per pipeline run

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::aggregate::AggregatedPayload;
use crate::config::{ReportConfig, parse_base_url};
use crate::error::{ConfigError, PipelineError};
use crate::prompt::ReportPrompt;

/// Generated report text
pub type ReportResult = String;

/// Turns aggregated price data into a natural-language report
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// Ask the model for a report on `payload` and return its text unmodified.
    ///
    /// The word limit in the prompt is advisory and is not checked here.
    async fn generate(&self, payload: &AggregatedPayload) -> Result<ReportResult, PipelineError>;
}

/// `POST {base}/api/report` with `{ "messages": [...] }`
#[derive(Debug, Clone)]
pub struct HttpReportGateway {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    content: Option<String>,
}

impl HttpReportGateway {
    /// Create a gateway against `api_base` with an optional request timeout
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut endpoint = parse_base_url(api_base)?;
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "report"]);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self, ConfigError> {
        Self::new(&config.api_base, config.report_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReportGateway for HttpReportGateway {
    #[instrument(skip_all, fields(payload_bytes = payload.len(), endpoint = %self.endpoint))]
    async fn generate(&self, payload: &AggregatedPayload) -> Result<ReportResult, PipelineError> {
        let prompt = ReportPrompt::build(payload)
            .map_err(|e| PipelineError::report_failed(format!("failed to render prompt: {e}")))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&prompt)
            .send()
            .await
            .map_err(|e| PipelineError::report_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::report_failed(format!("HTTP {status}")));
        }

        let body: ReportResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::report_failed(format!("unreadable response: {e}")))?;

        let content = body
            .content
            .ok_or_else(|| PipelineError::report_failed("response has no content"))?;

        debug!("Received report of {} chars", content.chars().count());
        Ok(content)
    }
}
