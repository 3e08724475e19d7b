use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded image after decoding and re-encoding to PNG
#[derive(Clone)]
pub struct EncodedImage {
    /// PNG bytes
    pub data: Vec<u8>,
    /// MIME type of `data`
    pub content_type: String,
    /// Filename the client uploaded the image under
    pub filename: String,
}

impl EncodedImage {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:<mime>;base64,<payload>` rendering used by the provider request bodies
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.to_base64())
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// Prompt plus reference images for one generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Reference images in upload order
    pub images: Vec<EncodedImage>,
}

/// One image entry returned by a provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePayload {
    /// Base64 payload, possibly carrying a `data:` URL prefix
    pub b64: Option<String>,
}

/// Provider output, normalized across provider variants
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub images: Vec<ImagePayload>,
    /// Cost reported by the provider, a JSON number or string
    pub cost: Option<serde_json::Value>,
    /// Text the model returned alongside the image
    pub text: Option<String>,
}

impl ProviderResponse {
    /// Cost as display text, without JSON quoting for strings
    pub fn cost_display(&self) -> Option<String> {
        match self.cost.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Response body of a successful `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerationResult {
    pub success: bool,
    /// Human readable status, includes the cost when the provider reported one
    pub message: String,
    /// Name of the stored output file
    pub filename: String,
    /// Text returned by the model, or a description of the provider used
    pub prompt_response: String,
}
