//! Error types module
//!
//! All failures of the generation pipeline are unified under [`AppError`]. Each variant
//! self-describes its HTTP status, log level and the message shown to the client through
//! [`ErrorMetadata`], so the API layer can render every error the same way.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for configuration problems and misbehaving providers
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PROVIDER_HTTP_ERROR"), used in logs only
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Invalid image '{filename}': {reason}")]
    InvalidImage { filename: String, reason: String },

    /// Name of the configuration variable that should hold the credential.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Provider returned HTTP {status}: {message}")]
    ProviderHttp { status: u16, message: String },

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Empty provider response: {0}")]
    EmptyResponse(String),

    #[error("Malformed image payload: {0}")]
    MalformedImagePayload(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingPrompt => (400, "MISSING_PROMPT", LogLevel::Debug),
        AppError::InvalidImage { .. } => (400, "INVALID_IMAGE", LogLevel::Debug),
        AppError::MissingCredential(_) => (500, "MISSING_CREDENTIAL", LogLevel::Warn),
        AppError::ProviderHttp { .. } => (500, "PROVIDER_HTTP_ERROR", LogLevel::Warn),
        AppError::ProviderUnavailable(_) => (500, "PROVIDER_UNAVAILABLE", LogLevel::Error),
        AppError::EmptyResponse(_) => (500, "EMPTY_RESPONSE", LogLevel::Warn),
        AppError::MalformedImagePayload(_) => (500, "MALFORMED_IMAGE_PAYLOAD", LogLevel::Warn),
        AppError::FileNotFound(_) => (404, "FILE_NOT_FOUND", LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::Storage(_) => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log records
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingPrompt => "MissingPrompt",
            AppError::InvalidImage { .. } => "InvalidImage",
            AppError::MissingCredential(_) => "MissingCredential",
            AppError::ProviderHttp { .. } => "ProviderHttp",
            AppError::ProviderUnavailable(_) => "ProviderUnavailable",
            AppError::EmptyResponse(_) => "EmptyResponse",
            AppError::MalformedImagePayload(_) => "MalformedImagePayload",
            AppError::FileNotFound(_) => "FileNotFound",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingPrompt => "Please enter a text prompt.".to_string(),
            AppError::InvalidImage { filename, reason } => {
                format!("Could not read image '{}': {}", filename, reason)
            }
            AppError::MissingCredential(var) => format!(
                "API key is not configured. Add {} to the .env file.",
                var
            ),
            AppError::ProviderHttp { message, .. } => format!("API error: {}", message),
            AppError::ProviderUnavailable(ref msg) => {
                format!("Image provider is unavailable: {}", msg)
            }
            AppError::EmptyResponse(_) => {
                "Could not process the image generation response.".to_string()
            }
            AppError::MalformedImagePayload(ref msg) => {
                format!("Generated image data is malformed: {}", msg)
            }
            AppError::FileNotFound(ref name) => format!("File not found: {}", name),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to store the generated image".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
