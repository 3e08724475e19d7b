use crate::multimodal::MultimodalProvider;
use crate::nano_gpt::NanoGptProvider;
use crate::provider::ImageProvider;
use anyhow::Context;
use promptpix_core::{Config, ProviderKind};
use std::sync::Arc;

/// Build the outbound HTTP client with the configured timeouts.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(config.provider_timeout())
        .connect_timeout(config.provider_connect_timeout())
        .build()
        .context("Failed to create HTTP client for image provider")
}

/// Create the image provider selected by configuration
pub fn create_provider(config: &Config) -> Result<Arc<dyn ImageProvider>, anyhow::Error> {
    let client = build_http_client(config)?;
    let api_key = config.api_key().map(String::from);

    if api_key.is_none() {
        tracing::warn!(
            provider = %config.provider(),
            variable = config.api_key_var(),
            "No API key configured; generation requests will fail until it is set"
        );
    }

    let provider: Arc<dyn ImageProvider> = match config.provider() {
        ProviderKind::NanoGpt => Arc::new(
            NanoGptProvider::builder()
                .client(client)
                .api_key(api_key)
                .api_url(config.api_url())
                .model(config.model())
                .size(config.image_size())
                .build(),
        ),
        ProviderKind::Multimodal => {
            let (width, height) = config.image_dimensions();
            Arc::new(
                MultimodalProvider::builder()
                    .client(client)
                    .api_key(api_key)
                    .api_url(config.api_url())
                    .model(config.model())
                    .dimensions(width, height)
                    .build(),
            )
        }
    };

    tracing::info!(
        provider = %provider.kind(),
        model = provider.model(),
        api_url = config.api_url(),
        "Image provider initialized"
    );

    Ok(provider)
}
