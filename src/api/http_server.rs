use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect::{api_detect_handler, detect_page_handler, detect_redirect_handler};
use super::occupancy::occupancy_handler;
use super::pages;
use super::results::{
    get_image_handler, get_record_handler, list_images_handler, list_records_handler,
};
use super::upload::{upload_handler, upload_redirect_handler};
use crate::config::Config;
use crate::storage::ArtifactStore;
use crate::version;
use crate::vision::Detector;

/// Shared state injected into every handler.
///
/// The detector handle is built once at startup and never swapped
/// afterwards; `None` means no model could be loaded and the inference
/// routes answer 503.
#[derive(Clone)]
pub struct AppState {
    pub detector: Option<Arc<dyn Detector>>,
    pub store: ArtifactStore,
    pub config: Arc<Config>,
}

/// Assemble the application router over the shared state
pub fn build_router(state: AppState) -> Router {
    // Multipart framing adds overhead on top of the image bytes themselves
    let body_limit = state.config.max_upload_bytes + 64 * 1024;

    Router::new()
        // Browser flow
        .route("/", get(index_handler))
        .route(
            "/detect",
            post(detect_page_handler).get(detect_redirect_handler),
        )
        // JSON API
        .route("/health", get(health_handler))
        .route("/api/detect", post(api_detect_handler))
        .route("/api/occupancy", post(occupancy_handler))
        // Persisted artifacts
        .route("/upload", post(upload_handler).get(upload_redirect_handler))
        .route("/results/json", get(list_records_handler))
        .route("/results/json/:id", get(get_record_handler))
        .route("/results/images", get(list_images_handler))
        .route("/results/images/:id", get(get_image_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn start_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.addr;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}

async fn index_handler() -> Html<String> {
    Html(pages::upload_form())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": version::VERSION_NUMBER,
        "model_loaded": state.detector.is_some(),
    }))
}
