use promptpix_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// An uploaded file could not be decoded as an image
    #[error("Invalid image '{filename}': {reason}")]
    InvalidImage { filename: String, reason: String },

    /// Provider output could not be turned into an image
    #[error("Malformed image payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::InvalidImage { filename, reason } => {
                AppError::InvalidImage { filename, reason }
            }
            ProcessingError::MalformedPayload(msg) => AppError::MalformedImagePayload(msg),
            ProcessingError::Encode(msg) => AppError::Internal(msg),
        }
    }
}
