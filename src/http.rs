//! HTTP transport module for symptom-scribe
//!
//! Serves the form page, the form submit action, a JSON extraction API,
//! and plain JSON health/info endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Form, Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::SymptomModel;
use crate::config::Config;
use crate::error::{Result, SymptomScribeError};
use crate::extractor::{Extraction, process_symptoms};
use crate::render::render_page;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub model: Arc<dyn SymptomModel>,
}

/// Body of the form submit and of the JSON API
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub input: String,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint: model settings, never the credential
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    Json(json!({
        "model": {
            "name": state.config.model.model,
            "base_url": state.config.model.base_url,
            "temperature": state.config.model.temperature,
            "timeout_secs": state.config.model.request_timeout_secs
        },
        "server": {
            "bind": state.config.http_bind.to_string()
        }
    }))
}

/// Empty form
pub async fn index_handler() -> Html<String> {
    Html(render_page("", None))
}

/// Form submit: the outcome is always shown on the page
pub async fn submit_handler(
    State(state): State<HttpState>,
    Form(req): Form<ExtractRequest>,
) -> Html<String> {
    let outcome = process_symptoms(state.model.as_ref(), &req.input).await;
    Html(render_page(&req.input, Some(&outcome)))
}

/// JSON API returning the tagged outcome
pub async fn api_extract_handler(
    State(state): State<HttpState>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    let outcome = process_symptoms(state.model.as_ref(), &req.input).await;
    (status_for(&outcome), Json(outcome)).into_response()
}

fn status_for(outcome: &Extraction) -> StatusCode {
    match outcome {
        Extraction::Empty => StatusCode::UNPROCESSABLE_ENTITY,
        Extraction::Failed { .. } | Extraction::InvalidStructure { .. } => StatusCode::BAD_GATEWAY,
        Extraction::NoSymptoms | Extraction::Symptoms { .. } => StatusCode::OK,
    }
}

async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let resp = next.run(req).await;
    tracing::info!(
        "{} {} -> {} ({}ms)",
        method,
        path,
        resp.status().as_u16(),
        start.elapsed().as_millis()
    );
    resp
}

/// Build the router over the given state
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/extract", post(api_extract_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, model: Arc<dyn SymptomModel>) -> Result<()> {
    let bind = config.http_bind;
    let app = router(HttpState { config, model });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| SymptomScribeError::Http {
            message: format!("Failed to bind HTTP listener on {bind}: {e}"),
        })?;

    tracing::info!("Starting HTTP server on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
