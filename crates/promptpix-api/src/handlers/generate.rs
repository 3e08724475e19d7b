use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use promptpix_core::models::GenerationResult;
use promptpix_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::generation::run_generation;
use crate::state::AppState;
use crate::utils::upload::extract_generation_form;

/// Generate an image from a prompt and optional reference images
///
/// Accepts `multipart/form-data` with a `prompt` text field and zero or more `images`
/// file parts. Files whose extension is not allowed are skipped. On success the stored
/// PNG is available under `/output/{filename}` and `/download/{filename}`.
///
/// The credential of the active provider is checked before the form is read.
///
/// # Errors
/// - `AppError::MissingCredential` - API key for the active provider is not set
/// - `AppError::MissingPrompt` - Prompt is missing or blank
/// - `AppError::InvalidImage` - An accepted upload could not be decoded
/// - `AppError::PayloadTooLarge` - Request body exceeds the upload limit
/// - `AppError::ProviderHttp` - Provider answered with a non-success status
#[utoipa::path(
    post,
    path = "/generate",
    tag = "generation",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image generated and stored", body = GenerationResult),
        (status = 400, description = "Missing prompt or unreadable image", body = ErrorResponse),
        (status = 413, description = "Request too large", body = ErrorResponse),
        (status = 500, description = "Provider or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "generate_image"))]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, HttpAppError> {
    // Nothing is read or decoded when no call can be made.
    if !state.provider.has_credential() {
        return Err(AppError::MissingCredential(state.config.api_key_var().to_string()).into());
    }

    let multipart = multipart.map_err(|e| {
        AppError::InvalidInput(format!("Expected a multipart form: {}", e.body_text()))
    })?;

    let form = extract_generation_form(
        multipart,
        &state.upload_validator,
        state.config.max_upload_size_bytes(),
    )
    .await?;

    let result = run_generation(&state, form).await?;

    Ok(Json(result))
}
