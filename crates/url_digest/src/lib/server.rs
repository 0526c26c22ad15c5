//! # HTTP server
//!
//! Axum server exposing `POST /api/summarise`. The handler runs both stages
//! (audio fallback disabled) and maps errors at this boundary: missing body
//! or URL is a 400, extraction failure a 502, LLM failure a 500.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    analyzer::{AnalysisRequest, AnalyzeError, Analyzer},
    extract::TextSource,
    llm::Completion,
};

pub struct AppState<S, C>
where
    S: TextSource + Send + Sync,
    C: Completion + Send + Sync,
{
    pub analyzer: Arc<Analyzer<S, C>>,
}

impl<S, C> Clone for AppState<S, C>
where
    S: TextSource + Send + Sync,
    C: Completion + Send + Sync,
{
    fn clone(&self) -> Self {
        AppState {
            analyzer: Arc::clone(&self.analyzer),
        }
    }
}

impl<S, C> AppState<S, C>
where
    S: TextSource + Send + Sync,
    C: Completion + Send + Sync,
{
    pub fn new(analyzer: Analyzer<S, C>) -> Self {
        AppState {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Create the application router.
pub fn create_router<S, C>(state: AppState<S, C>) -> Router
where
    S: TextSource + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/summarise", post(summarise::<S, C>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server<S, C>(analyzer: Analyzer<S, C>, port: u16) -> anyhow::Result<()>
where
    S: TextSource + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
{
    let app = create_router(AppState::new(analyzer));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Server listening on http://0.0.0.0:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SummariseBody {
    url: Option<String>,
    summary_prompt: Option<String>,
    sentiment_prompt: Option<String>,
    #[serde(default)]
    strict: bool,
}

async fn summarise<S, C>(
    State(state): State<AppState<S, C>>,
    body: Result<Json<SummariseBody>, JsonRejection>,
) -> Response
where
    S: TextSource + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
{
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "No data provided");
    };
    let Some(url) = body.url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No URL provided");
    };

    let request = AnalysisRequest {
        url: url.clone(),
        summary_prompt: body.summary_prompt,
        sentiment_prompt: body.sentiment_prompt,
        strict: body.strict,
        ..Default::default()
    };

    match state.analyzer.analyze(&request).await {
        Ok(result) => {
            let summary = result.summary.unwrap_or_default();
            let sentiment = result
                .sentiment
                .map(|s| json!({ "score": s.score, "summary": s.summary }))
                .unwrap_or(json!(null));
            (
                StatusCode::OK,
                Json(json!({ "url": url, "summary": summary, "sentiment": sentiment })),
            )
                .into_response()
        }
        Err(AnalyzeError::Extraction(e)) => {
            tracing::error!(error = %e, "Extraction failed");
            error_response(StatusCode::BAD_GATEWAY, &e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
