//! HTTP routes

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use report_llm::providers::{OpenAIConfig, OpenAIProvider};
use report_llm::{CompletionRequest, LLMProvider, Message};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::upstream::PolygonClient;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    polygon: PolygonClient,
    llm: Arc<dyn LLMProvider>,
    model: Arc<str>,
    temperature: f32,
}

impl AppState {
    pub fn new(
        polygon: PolygonClient,
        llm: Arc<dyn LLMProvider>,
        model: impl Into<Arc<str>>,
        temperature: f32,
    ) -> Self {
        Self {
            polygon,
            llm,
            model: model.into(),
            temperature,
        }
    }

    /// Polygon client plus an OpenAI-compatible provider from `config`
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let polygon = PolygonClient::new(
            &config.polygon_base,
            config.polygon_api_key.clone(),
            config.upstream_timeout,
        )?;

        let mut openai = OpenAIConfig::new(config.openai_api_key.clone());
        if let Some(api_base) = &config.openai_api_base {
            openai = openai.with_api_base(api_base.clone());
        }
        let llm = OpenAIProvider::with_config(openai)?;
        info!(provider = llm.name(), model = %config.model, "completion provider ready");

        Ok(Self::new(
            polygon,
            Arc::new(llm),
            config.model.as_str(),
            config.temperature,
        ))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/agg/:ticker", get(aggregates))
        .route("/api/report", post(report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AggregatesQuery {
    pub start: String,
    pub end: String,
}

#[instrument(skip(state))]
async fn aggregates(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<AggregatesQuery>,
) -> Result<Response> {
    let upstream = state
        .polygon
        .daily_aggregates(&ticker, &query.start, &query.end)
        .await?;

    let mut response = (upstream.status, upstream.body).into_response();
    if let Some(content_type) = upstream.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub messages: Vec<Message>,
}

#[instrument(skip_all)]
async fn report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Message>> {
    let completion = CompletionRequest::new(state.model.as_ref(), request.messages)
        .with_temperature(state.temperature);

    let response = state.llm.complete(completion).await?;
    info!(
        tokens = response.usage.total(),
        stop_reason = ?response.stop_reason,
        "report generated"
    );
    Ok(Json(response.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use httpmock::prelude::*;
    use report_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Provider that answers with a fixed reply and keeps the last request
    struct StubProvider {
        reply: std::result::Result<String, String>,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(None),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason.to_string()),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn complete(&self, request: CompletionRequest) -> report_llm::Result<CompletionResponse> {
            *self.seen.lock().unwrap() = Some(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                }),
                Err(reason) => Err(LLMError::RateLimited(reason.clone())),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn app(polygon_base: &str, llm: Arc<dyn LLMProvider>) -> Router {
        let polygon = PolygonClient::new(polygon_base, "pk", None).unwrap();
        router(AppState::new(polygon, llm, "gpt-4o-mini", 1.1))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn report_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/report")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_aggregates_relays_upstream() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/aggs/ticker/TSLA/range/1/day/2024-05-01/2024-05-03")
                    .query_param("apiKey", "pk");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"ticker":"TSLA","results":[{"c":177.5}]}"#);
            })
            .await;

        let response = app(&server.base_url(), StubProvider::replying("unused"))
            .oneshot(
                Request::get("/api/agg/TSLA?start=2024-05-01&end=2024-05-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({"ticker": "TSLA", "results": [{"c": 177.5}]})
        );
    }

    #[tokio::test]
    async fn test_aggregates_passes_through_upstream_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/aggs/ticker/ZZZZ/range/1/day/2024-05-01/2024-05-03");
                then.status(403).body("forbidden");
            })
            .await;

        let response = app(&server.base_url(), StubProvider::replying("unused"))
            .oneshot(
                Request::get("/api/agg/ZZZZ?start=2024-05-01&end=2024-05-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"forbidden");
    }

    #[tokio::test]
    async fn test_aggregates_transport_failure_is_500() {
        let response = app("http://127.0.0.1:1", StubProvider::replying("unused"))
            .oneshot(
                Request::get("/api/agg/TSLA?start=2024-05-01&end=2024-05-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_report_returns_first_message() {
        let provider = StubProvider::replying("TSLA: hold.");
        let response = app("http://127.0.0.1:1", provider.clone())
            .oneshot(report_request(&json!({
                "messages": [
                    {"role": "system", "content": "You are a trading guru."},
                    {"role": "user", "content": "TSLA data"}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"role": "assistant", "content": "TSLA: hold."})
        );

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model, "gpt-4o-mini");
        assert_eq!(seen.temperature, Some(1.1));
        assert_eq!(seen.messages.len(), 2);
        assert_eq!(seen.messages[0], Message::system("You are a trading guru."));
    }

    #[tokio::test]
    async fn test_report_provider_failure_is_500() {
        let response = app("http://127.0.0.1:1", StubProvider::failing("slow down"))
            .oneshot(report_request(&json!({
                "messages": [{"role": "user", "content": "TSLA data"}]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("slow down"));
    }
}
