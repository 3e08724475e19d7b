//! PromptPix Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the upload pipeline, the provider adapters and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod provider_kind;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GenerationConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use provider_kind::ProviderKind;
