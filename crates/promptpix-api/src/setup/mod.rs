//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::Result;
use promptpix_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(config.environment())?;

    tracing::info!(
        environment = %config.environment(),
        provider = %config.provider(),
        "Configuration loaded and validated successfully"
    );

    build_app(config).await
}

/// Build state and routes without touching global tracing state.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let state = services::initialize_services(&config).await?;
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
