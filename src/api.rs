//! HTTP API
//!
//! REST endpoints for sources, run dispatch, and stored results, plus the
//! SSE stream of run events.

use crate::service::ScrapeService;
use crate::types::OutcomeKind;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Create the API router with all endpoints
pub fn create_router(service: Arc<ScrapeService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/scraping/sources", get(get_sources))
        .route("/api/scraping/run", post(run_task))
        .route("/api/scraping/results", get(get_results))
        .route("/api/events/status-stream", get(status_stream))
        .with_state(service)
        // CORS for the dashboard frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// GET /health - liveness probe
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}

/// GET /api/scraping/sources - registered source names, in order
async fn get_sources(State(service): State<Arc<ScrapeService>>) -> impl IntoResponse {
    Json(service.sources())
}

#[derive(Debug, Deserialize)]
struct RunParams {
    source: String,
}

/// POST /api/scraping/run?source=... - dispatch one background run
///
/// Responds 202 immediately; the run executes asynchronously and cannot
/// be cancelled or tracked beyond the event stream.
async fn run_task(
    State(service): State<Arc<ScrapeService>>,
    Query(params): Query<RunParams>,
) -> impl IntoResponse {
    if !service.sources().iter().any(|s| s == &params.source) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "detail": format!("Source '{}' is not registered.", params.source)
            })),
        );
    }

    info!(source = %params.source, "scrape task accepted");
    let source = params.source.clone();
    tokio::spawn(async move {
        let outcome = service.run(&source).await;
        if !outcome.is_success() {
            error!(source = %source, message = %outcome.message, "background run did not succeed");
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "message": format!("Scraping task for '{}' started in the background.", params.source)
        })),
    )
}

#[derive(Debug, Deserialize)]
struct ResultsParams {
    source: Option<String>,
}

/// GET /api/scraping/results?source=... - stored batch documents
async fn get_results(
    State(service): State<Arc<ScrapeService>>,
    Query(params): Query<ResultsParams>,
) -> Response {
    let outcome = service.results(params.source.as_deref()).await;
    match outcome.kind {
        OutcomeKind::Error => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": outcome.message })),
        )
            .into_response(),
        _ => Json(outcome.data.unwrap_or_default()).into_response(),
    }
}

/// GET /api/events/status-stream - SSE stream of run events
///
/// No replay or offset semantics: a client reconnecting after a gap has
/// lost the intervening events.
async fn status_stream(State(service): State<Arc<ScrapeService>>) -> impl IntoResponse {
    let rx = service.events().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(json) => Some(Ok::<_, Infallible>(Event::default().data(json))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            Some(Ok(Event::default().event("lagged").data(skipped.to_string())))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
