//! PromptPix Providers Library
//!
//! Adapters for the external image generation services. Each adapter turns a
//! [`GenerationRequest`](promptpix_core::models::GenerationRequest) into exactly one
//! outbound HTTP call and normalizes the answer into a
//! [`ProviderResponse`](promptpix_core::models::ProviderResponse).
//!
//! Supported providers:
//! - **Nano-GPT**: REST `/v1/images/generations` endpoint returning `b64_json` images
//! - **Multimodal**: OpenAI-compatible chat completions with image output (e.g. OpenRouter)

pub mod error;
pub mod factory;
mod http;
pub mod multimodal;
pub mod nano_gpt;
pub mod provider;

pub use error::ProviderError;
pub use factory::{build_http_client, create_provider};
pub use multimodal::MultimodalProvider;
pub use nano_gpt::NanoGptProvider;
pub use provider::ImageProvider;
