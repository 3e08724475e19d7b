//! Application state shared by all handlers.

use promptpix_core::Config;
use promptpix_processing::UploadValidator;
use promptpix_providers::ImageProvider;
use promptpix_storage::OutputStore;
use std::sync::Arc;

/// Immutable per-process state. Requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn ImageProvider>,
    pub output_store: Arc<dyn OutputStore>,
    pub upload_validator: UploadValidator,
}
