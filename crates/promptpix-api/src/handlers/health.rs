use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Active provider, `nano-gpt` or `multimodal`
    pub provider: String,
    pub model: String,
    /// Whether an API key is configured for the active provider
    pub credential_configured: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.provider.kind().as_str().to_string(),
        model: state.provider.model().to_string(),
        credential_configured: state.provider.has_credential(),
    })
}
