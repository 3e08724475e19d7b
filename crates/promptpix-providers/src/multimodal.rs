//! Multimodal chat provider: OpenAI-compatible chat completions with image output
//! (OpenRouter, Gemini image models).

use crate::error::ProviderError;
use crate::http::post_json;
use crate::provider::ImageProvider;
use async_trait::async_trait;
use promptpix_core::models::{GenerationRequest, ImagePayload, ProviderResponse};
use promptpix_core::constants::{
    DEFAULT_MULTIMODAL_API_URL, DEFAULT_MULTIMODAL_MODEL, MULTIMODAL_API_KEY_VAR,
};
use promptpix_core::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Builder for MultimodalProvider.
#[derive(Clone, Default)]
pub struct MultimodalProviderBuilder {
    client: Option<reqwest::Client>,
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    dimensions: Option<(u32, u32)>,
}

impl MultimodalProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

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

    /// Requested output size; sent as an aspect ratio.
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn build(self) -> MultimodalProvider {
        let (width, height) = self.dimensions.unwrap_or((1024, 1024));
        MultimodalProvider {
            client: self.client.unwrap_or_default(),
            api_key: self.api_key,
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_MULTIMODAL_API_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MULTIMODAL_MODEL.to_string()),
            aspect_ratio: aspect_ratio(width, height),
        }
    }
}

/// Multimodal chat completions provider.
pub struct MultimodalProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    aspect_ratio: String,
}

impl std::fmt::Debug for MultimodalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultimodalProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl MultimodalProvider {
    /// Creates a new `MultimodalProviderBuilder`.
    pub fn builder() -> MultimodalProviderBuilder {
        MultimodalProviderBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for MultimodalProvider {
    #[tracing::instrument(skip(self, request), fields(model = %self.model, images = request.images.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential(MULTIMODAL_API_KEY_VAR.to_string()))?;

        let body = ChatRequest::from_generation_request(request, &self.model, &self.aspect_ratio);

        let response: ChatResponse =
            post_json(&self.client, self.kind(), &self.api_url, api_key, &body).await?;

        Ok(response.into_provider_response())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Multimodal
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Reduce `width x height` to its smallest `W:H` ratio.
fn aspect_ratio(width: u32, height: u32) -> String {
    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    let divisor = gcd(width, height).max(1);
    format!("{}:{}", width / divisor, height / divisor)
}


// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    modalities: [&'static str; 2],
    n: u32,
    image_config: ImageConfig<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ImageConfig<'a> {
    aspect_ratio: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn from_generation_request(
        request: &GenerationRequest,
        model: &'a str,
        aspect_ratio: &'a str,
    ) -> Self {
        let mut content = Vec::with_capacity(request.images.len() + 1);
        content.push(ContentPart::Text {
            text: request.prompt.clone(),
        });
        content.extend(request.images.iter().map(|image| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.to_data_url(),
            },
        }));

        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            modalities: ["image", "text"],
            n: 1,
            image_config: ImageConfig { aspect_ratio },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponseMessage {
    /// A string, null, or an array of content parts depending on the backend
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    images: Vec<ResponseImage>,
}

#[derive(Debug, Deserialize)]
struct ResponseImage {
    #[serde(default)]
    image_url: Option<ImageUrl>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    cost: Option<Value>,
}

impl ChatResponse {
    fn into_provider_response(self) -> ProviderResponse {
        let cost = self.usage.and_then(|u| u.cost).filter(|c| !c.is_null());
        let message = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .unwrap_or_default();

        let mut urls: Vec<String> = message
            .images
            .into_iter()
            .filter_map(|image| image.image_url.map(|u| u.url))
            .collect();

        let mut texts = Vec::new();
        match message.content {
            Some(Value::String(text)) => texts.push(text),
            Some(Value::Array(parts)) => {
                for part in parts {
                    match serde_json::from_value::<ContentPart>(part) {
                        Ok(ContentPart::Text { text }) => texts.push(text),
                        Ok(ContentPart::ImageUrl { image_url }) => urls.push(image_url.url),
                        Err(_) => {}
                    }
                }
            }
            _ => {}
        }

        let text = texts.join("\n");
        let text = text.trim();

        ProviderResponse {
            images: urls
                .into_iter()
                .map(|url| ImagePayload { b64: Some(url) })
                .collect(),
            cost,
            text: (!text.is_empty()).then(|| text.to_string()),
        }
    }
}
