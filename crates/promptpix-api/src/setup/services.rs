//! Service wiring: provider, output store and upload validation.

use crate::state::AppState;
use anyhow::{Context, Result};
use promptpix_core::Config;
use promptpix_processing::UploadValidator;
use promptpix_providers::create_provider;
use promptpix_storage::LocalOutputStore;
use std::sync::Arc;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let provider = create_provider(config)?;

    let output_store = LocalOutputStore::new(config.output_dir())
        .await
        .context("Failed to prepare output directory")?;

    tracing::info!(
        output_dir = %config.output_dir().display(),
        "Output store initialized"
    );

    let upload_validator = UploadValidator::new(config.allowed_extensions().to_vec());

    Ok(Arc::new(AppState {
        config: config.clone(),
        provider,
        output_store: Arc::new(output_store),
        upload_validator,
    }))
}
