//! Image provider trait.

use crate::error::ProviderError;
use async_trait::async_trait;
use promptpix_core::models::{GenerationRequest, ProviderResponse};
use promptpix_core::ProviderKind;

/// An external image generation service.
///
/// Implementations make exactly one HTTP call per [`generate`](ImageProvider::generate)
/// and never retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    ///
    /// Fails with [`ProviderError::MissingCredential`] before any network call when no
    /// API key is configured.
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ProviderError>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Whether an API key is configured.
    fn has_credential(&self) -> bool;

    /// Returns the name of this provider for display.
    fn name(&self) -> &'static str {
        self.kind().display_name()
    }
}
