//! Polygon daily aggregates client

use axum::http::{HeaderValue, StatusCode, header};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, ServerError};

/// Raw upstream answer, relayed to the caller as-is
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: String,
}

/// Client for `v2/aggs/ticker/{ticker}/range/1/day/{start}/{end}`
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl PolygonClient {
    pub fn new(base: &str, api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let invalid = |reason: String| ServerError::InvalidUrl {
            url: base.to_string(),
            reason,
        };
        let base = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
            api_key: api_key.into(),
        })
    }

    fn aggregates_url(&self, ticker: &str, start: &str, end: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v2", "aggs", "ticker", ticker, "range", "1", "day", start, end,
            ]);
        }
        url.query_pairs_mut().append_pair("apiKey", &self.api_key);
        url
    }

    /// Fetch one ticker's daily bars. Non-success statuses are returned, not
    /// turned into errors; only transport failures are.
    #[instrument(skip(self))]
    pub async fn daily_aggregates(
        &self,
        ticker: &str,
        start: &str,
        end: &str,
    ) -> Result<UpstreamResponse> {
        let response = self
            .client
            .get(self.aggregates_url(ticker, start, end))
            .send()
            .await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "polygon answered");

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_aggregates_url() {
        let client = PolygonClient::new("https://api.polygon.io", "secret", None).unwrap();
        let url = client.aggregates_url("TSLA", "2024-05-01", "2024-05-03");
        assert_eq!(
            url.as_str(),
            "https://api.polygon.io/v2/aggs/ticker/TSLA/range/1/day/2024-05-01/2024-05-03?apiKey=secret"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        let err = PolygonClient::new("not a url", "k", None).unwrap_err();
        assert!(matches!(err, ServerError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_non_success_is_relayed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/aggs/ticker/NOPE/range/1/day/2024-05-01/2024-05-03")
                    .query_param("apiKey", "k");
                then.status(404)
                    .header("content-type", "application/json")
                    .body(r#"{"status":"NOT_FOUND"}"#);
            })
            .await;

        let client = PolygonClient::new(&server.base_url(), "k", None).unwrap();
        let response = client
            .daily_aggregates("NOPE", "2024-05-01", "2024-05-03")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, r#"{"status":"NOT_FOUND"}"#);
        assert_eq!(
            response.content_type,
            Some(HeaderValue::from_static("application/json"))
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let client = PolygonClient::new("http://127.0.0.1:1", "k", None).unwrap();
        let err = client
            .daily_aggregates("TSLA", "2024-05-01", "2024-05-03")
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Upstream(_)));
    }
}
