//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use promptpix_core::Config;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Slack above the upload limit for multipart framing before the transport-level cap applies.
const BODY_LIMIT_HEADROOM_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let max_upload = config.max_upload_size_bytes();

    let app = Router::new()
        .route("/", get(handlers::pages::index))
        .route("/result", get(handlers::pages::result))
        .route("/generate", post(handlers::generate::generate_image))
        .route("/download/{filename}", get(handlers::files::download_output))
        .route("/output/{filename}", get(handlers::files::serve_output))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        // Multipart reads past this limit fail with a 413 rendered as JSON by the handler.
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(RequestBodyLimitLayer::new(
            max_upload.saturating_add(BODY_LIMIT_HEADROOM_BYTES),
        ))
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        max_upload_bytes = max_upload,
        "Routes configured"
    );

    Ok(app)
}
