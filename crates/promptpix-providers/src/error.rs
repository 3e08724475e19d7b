use promptpix_core::AppError;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Name of the variable that should hold the credential
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else if err.is_timeout() {
            ProviderError::Unavailable(format!("request timed out: {}", err))
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential(var) => AppError::MissingCredential(var),
            ProviderError::Http { status, message } => AppError::ProviderHttp { status, message },
            ProviderError::Unavailable(msg) => AppError::ProviderUnavailable(msg),
            ProviderError::InvalidResponse(msg) => AppError::EmptyResponse(msg),
        }
    }
}

/// Pull a human readable message out of a non-2xx response body.
///
/// Looks at `error` (a string, or an object with `message`), then `message`, and
/// falls back to `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|v| {
            let from_error = match v.get("error") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Object(obj)) => obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(String::from),
                _ => None,
            };
            from_error
                .filter(|m| !m.trim().is_empty())
                .or_else(|| v.get("message").and_then(Value::as_str).map(String::from))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}
