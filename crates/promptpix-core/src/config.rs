//! Configuration module
//!
//! Configuration is read once at startup from the process environment (and an optional
//! `.env` file) into an immutable [`Config`] that is handed to the provider and storage
//! constructors.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_IMAGE_SIZE, DEFAULT_MULTIMODAL_API_URL,
    DEFAULT_MULTIMODAL_MODEL, DEFAULT_NANO_GPT_API_URL, DEFAULT_NANO_GPT_MODEL,
    MULTIMODAL_API_KEY_VAR, NANO_GPT_API_KEY_VAR,
};
use crate::provider_kind::ProviderKind;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 16;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;
const PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;


/// Server and upload settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub output_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

/// External image generation settings
#[derive(Clone)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub nano_gpt_api_key: Option<String>,
    pub nano_gpt_api_url: String,
    pub nano_gpt_model: String,
    pub multimodal_api_key: Option<String>,
    pub multimodal_api_url: String,
    pub multimodal_model: String,
    /// Requested output size as given, e.g. `1024x1024`
    pub image_size: String,
    pub image_width: u32,
    pub image_height: u32,
    pub provider_timeout_secs: u64,
}

// Keys never end up in logs.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("nano_gpt_api_key", &self.nano_gpt_api_key.as_ref().map(|_| "***"))
            .field("nano_gpt_api_url", &self.nano_gpt_api_url)
            .field("nano_gpt_model", &self.nano_gpt_model)
            .field(
                "multimodal_api_key",
                &self.multimodal_api_key.as_ref().map(|_| "***"),
            )
            .field("multimodal_api_url", &self.multimodal_api_url)
            .field("multimodal_model", &self.multimodal_model)
            .field("image_size", &self.image_size)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let max_upload_size_mb = match get("MAX_UPLOAD_SIZE_MB") {
            Some(mb) => mb
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?,
            None => DEFAULT_MAX_UPLOAD_SIZE_MB,
        };

        let allowed_extensions = match get("ALLOWED_EXTENSIONS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let base = BaseConfig {
            server_port,
            environment,
            output_dir: PathBuf::from(
                get("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            max_upload_size_bytes,
            allowed_extensions,
        };

        let provider = match get("IMAGE_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::NanoGpt,
        };

        let image_size = get("IMAGE_SIZE").unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string());
        let (image_width, image_height) = parse_image_size(&image_size)?;

        let provider_timeout_secs = match get("PROVIDER_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .map_err(|_| anyhow::anyhow!("PROVIDER_TIMEOUT_SECS must be a valid number"))?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };

        let generation = GenerationConfig {
            provider,
            nano_gpt_api_key: get(NANO_GPT_API_KEY_VAR),
            nano_gpt_api_url: get("NANO_GPT_API_URL")
                .unwrap_or_else(|| DEFAULT_NANO_GPT_API_URL.to_string()),
            nano_gpt_model: get("NANO_GPT_MODEL")
                .unwrap_or_else(|| DEFAULT_NANO_GPT_MODEL.to_string()),
            multimodal_api_key: get(MULTIMODAL_API_KEY_VAR),
            multimodal_api_url: get("MULTIMODAL_API_URL")
                .unwrap_or_else(|| DEFAULT_MULTIMODAL_API_URL.to_string()),
            multimodal_model: get("MULTIMODAL_MODEL")
                .unwrap_or_else(|| DEFAULT_MULTIMODAL_MODEL.to_string()),
            image_size,
            image_width,
            image_height,
            provider_timeout_secs,
        };

        let config = Config { base, generation };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.base.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must contain at least one extension"
            ));
        }

        if self.generation.provider_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PROVIDER_TIMEOUT_SECS must be greater than 0"
            ));
        }

        let url = self.api_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "{} API URL must be an http(s) URL, got '{}'",
                self.provider().display_name(),
                url
            ));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn output_dir(&self) -> &Path {
        &self.base.output_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.base.max_upload_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.base.allowed_extensions
    }

    pub fn provider(&self) -> ProviderKind {
        self.generation.provider
    }

    /// Credential for the selected provider, if configured
    pub fn api_key(&self) -> Option<&str> {
        match self.generation.provider {
            ProviderKind::NanoGpt => self.generation.nano_gpt_api_key.as_deref(),
            ProviderKind::Multimodal => self.generation.multimodal_api_key.as_deref(),
        }
    }

    /// Name of the variable holding the selected provider's credential
    pub fn api_key_var(&self) -> &'static str {
        match self.generation.provider {
            ProviderKind::NanoGpt => NANO_GPT_API_KEY_VAR,
            ProviderKind::Multimodal => MULTIMODAL_API_KEY_VAR,
        }
    }

    pub fn api_url(&self) -> &str {
        match self.generation.provider {
            ProviderKind::NanoGpt => &self.generation.nano_gpt_api_url,
            ProviderKind::Multimodal => &self.generation.multimodal_api_url,
        }
    }

    pub fn model(&self) -> &str {
        match self.generation.provider {
            ProviderKind::NanoGpt => &self.generation.nano_gpt_model,
            ProviderKind::Multimodal => &self.generation.multimodal_model,
        }
    }

    pub fn image_size(&self) -> &str {
        &self.generation.image_size
    }

    pub fn image_dimensions(&self) -> (u32, u32) {
        (self.generation.image_width, self.generation.image_height)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.provider_timeout_secs)
    }

    pub fn provider_connect_timeout(&self) -> Duration {
        Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS.min(self.generation.provider_timeout_secs))
    }
}

/// Parse a `WIDTHxHEIGHT` size string.
pub fn parse_image_size(size: &str) -> Result<(u32, u32), anyhow::Error> {
    let (w, h) = size
        .trim()
        .to_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().parse::<u32>(), h.trim().parse::<u32>()))
        .ok_or_else(|| anyhow::anyhow!("IMAGE_SIZE must look like 1024x1024, got '{}'", size))?;

    match (w, h) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(anyhow::anyhow!(
            "IMAGE_SIZE must look like 1024x1024, got '{}'",
            size
        )),
    }
}
