//! Nano-GPT image generation provider (`/v1/images/generations`).

use crate::error::ProviderError;
use crate::http::post_json;
use crate::provider::ImageProvider;
use async_trait::async_trait;
use promptpix_core::models::{GenerationRequest, ImagePayload, ProviderResponse};
use promptpix_core::constants::{
    DEFAULT_IMAGE_SIZE, DEFAULT_NANO_GPT_API_URL, DEFAULT_NANO_GPT_MODEL, NANO_GPT_API_KEY_VAR,
};
use promptpix_core::ProviderKind;
use serde::{Deserialize, Serialize};

/// Builder for NanoGptProvider.
#[derive(Clone, Default)]
pub struct NanoGptProviderBuilder {
    client: Option<reqwest::Client>,
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    size: Option<String>,
}

impl NanoGptProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP client (timeouts are configured on the client).
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the API key. A missing key is reported per request, not here.
    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the requested output size, e.g. `1024x1024`.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn build(self) -> NanoGptProvider {
        NanoGptProvider {
            client: self.client.unwrap_or_default(),
            api_key: self.api_key,
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_NANO_GPT_API_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_NANO_GPT_MODEL.to_string()),
            size: self.size.unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
        }
    }
}

/// Nano-GPT image generation provider.
pub struct NanoGptProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    size: String,
}

impl std::fmt::Debug for NanoGptProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NanoGptProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("size", &self.size)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl NanoGptProvider {
    /// Creates a new `NanoGptProviderBuilder`.
    pub fn builder() -> NanoGptProviderBuilder {
        NanoGptProviderBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for NanoGptProvider {
    #[tracing::instrument(skip(self, request), fields(model = %self.model, images = request.images.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential(NANO_GPT_API_KEY_VAR.to_string()))?;

        let body = NanoGptRequest::from_generation_request(request, &self.model, &self.size);

        let response: NanoGptResponse =
            post_json(&self.client, self.kind(), &self.api_url, api_key, &body).await?;

        Ok(response.into_provider_response())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::NanoGpt
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct NanoGptRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
    #[serde(rename = "imageDataUrl", skip_serializing_if = "Option::is_none")]
    image_data_url: Option<String>,
    #[serde(rename = "imageDataUrls", skip_serializing_if = "Option::is_none")]
    image_data_urls: Option<Vec<String>>,
}

impl<'a> NanoGptRequest<'a> {
    fn from_generation_request(request: &'a GenerationRequest, model: &'a str, size: &'a str) -> Self {
        let mut urls: Vec<String> = request.images.iter().map(|i| i.to_data_url()).collect();

        // One image goes in `imageDataUrl`, several in `imageDataUrls`.
        let (image_data_url, image_data_urls) = match urls.len() {
            0 => (None, None),
            1 => (urls.pop(), None),
            _ => (None, Some(urls)),
        };

        Self {
            model,
            prompt: &request.prompt,
            n: 1,
            size,
            response_format: "b64_json",
            image_data_url,
            image_data_urls,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NanoGptResponse {
    #[serde(default)]
    data: Vec<NanoGptImage>,
    #[serde(default)]
    cost: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NanoGptImage {
    #[serde(default)]
    b64_json: Option<String>,
}

impl NanoGptResponse {
    fn into_provider_response(self) -> ProviderResponse {
        ProviderResponse {
            images: self
                .data
                .into_iter()
                .map(|image| ImagePayload { b64: image.b64_json })
                .collect(),
            cost: self.cost.filter(|c| !c.is_null()),
            text: None,
        }
    }
}
