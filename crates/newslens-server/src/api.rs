//! HTTP API handlers for article analysis, story fetching, and health.
//!
//! Three routes: `POST /analyze`, `POST /stories`, and `GET /health`. The
//! model trains (or loads) in a background task at startup; until it is
//! ready, analysis and story requests answer `503` with a `model_not_ready`
//! code rather than blocking.

use crate::providers::{HttpNewsProvider, HttpRewriteProvider};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use newslens_core::{AnalyzeRequest, ErrorCode, NewsQuery, ServerConfig, StoriesRequest};
use newslens_core::{NewsProvider, RewriteProvider};
use newslens_detector::BiasDetector;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    /// Trained detector; `None` until startup training completes.
    pub detector: RwLock<Option<Arc<BiasDetector>>>,
    pub news: Option<Arc<dyn NewsProvider>>,
    pub rewrite: Option<Arc<dyn RewriteProvider>>,
}

/// Build the shared [`AppState`] from the server configuration.
///
/// The detector slot starts empty; call [`spawn_model_training`] to fill it.
pub fn build_app_state(config: ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_millis(
            config.providers.connect_timeout_ms,
        ))
        .timeout(std::time::Duration::from_millis(config.providers.timeout_ms))
        .build()?;

    let news = HttpNewsProvider::from_config(client.clone(), &config.providers)
        .map(|p| Arc::new(p) as Arc<dyn NewsProvider>);
    let rewrite = HttpRewriteProvider::from_config(client, &config.providers)
        .map(|p| Arc::new(p) as Arc<dyn RewriteProvider>);

    if news.is_none() {
        info!("no news API key configured, stories and comparisons disabled");
    }
    if rewrite.is_none() {
        info!("no rewrite API key configured, neutral rewrites disabled");
    }

    Ok(Arc::new(AppState {
        config,
        detector: RwLock::new(None),
        news,
        rewrite,
    }))
}

/// Train or load the model off the async runtime, then publish it to the
/// state. Requests arriving before completion get `model_not_ready`.
pub fn spawn_model_training(state: Arc<AppState>) {
    tokio::spawn(async move {
        let model_config = state.config.model.clone();
        match tokio::task::spawn_blocking(move || BiasDetector::train_or_load(&model_config)).await
        {
            Ok(Ok(detector)) => {
                *state.detector.write().await = Some(Arc::new(detector));
                info!("model ready");
            }
            Ok(Err(e)) => error!(error = %e, "model training failed"),
            Err(e) => error!(error = %e, "model training task panicked"),
        }
    });
}

/// Build the axum [`Router`] with all routes and the CORS layer.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/stories", post(stories_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => CorsLayer::new(),
    }
}

/// Uniform error body: `{"detail": …, "code": …}`.
fn api_error(status: StatusCode, code: ErrorCode, detail: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "detail": detail,
            "code": code.to_string(),
        })),
    )
        .into_response()
}

/// `POST /analyze`
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                &rejection.body_text(),
            )
        }
    };

    let Some(detector) = state.detector.read().await.clone() else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ModelNotReady,
            ErrorCode::ModelNotReady.detail(),
        );
    };

    let result = detector
        .analyze(
            &request.text,
            state.news.as_deref(),
            state.rewrite.as_deref(),
        )
        .await;

    Json(result).into_response()
}

/// `POST /stories`
pub async fn stories_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StoriesRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                &rejection.body_text(),
            )
        }
    };

    let Some(detector) = state.detector.read().await.clone() else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ModelNotReady,
            ErrorCode::ModelNotReady.detail(),
        );
    };

    let query = NewsQuery {
        category: request.category,
        query: request.query,
        count: request.count,
    };
    let stories = detector.fetch_stories(&query, state.news.as_deref()).await;

    Json(stories).into_response()
}

/// `GET /health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let model_ready = state.detector.read().await.is_some();
    Json(serde_json::json!({
        "status": "healthy",
        "model_ready": model_ready,
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
