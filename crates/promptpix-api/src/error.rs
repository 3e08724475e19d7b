//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Every `AppError` renders as
//! `{"error": "<client message>"}` with the status code its metadata declares.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptpix_core::{AppError, ErrorMetadata, LogLevel};
use promptpix_storage::StorageError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from promptpix-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, code = code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, code = code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                code = code,
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

// Convert domain errors to AppError/HttpAppError (avoids orphan rule: we impl for local HttpAppError)

/// Map a storage failure onto the application taxonomy.
///
/// Names outside the generator pattern are reported as missing files.
pub fn app_error_from_storage(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(name) => AppError::FileNotFound(name),
        StorageError::InvalidKey(name) => AppError::FileNotFound(name),
        StorageError::WriteFailed(msg) => AppError::Storage(msg),
        StorageError::ReadFailed(msg) => AppError::Storage(msg),
        StorageError::NameCollision(attempts) => AppError::Storage(format!(
            "no free output filename after {} attempts",
            attempts
        )),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(app_error_from_storage(err))
    }
}

/// Map a multipart read failure; body limit violations become 413.
pub fn app_error_from_multipart(err: MultipartError, max_upload_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Request body exceeds the maximum upload size of {} MB",
            max_upload_bytes / 1024 / 1024
        ))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart form: {}", err.body_text()))
    }
}
