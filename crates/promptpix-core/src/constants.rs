//! Shared constants.

/// Prefix of every generated output filename.
pub const OUTPUT_FILENAME_PREFIX: &str = "generated_";

/// Extension of every generated output file.
pub const OUTPUT_FILE_EXTENSION: &str = "png";

/// MIME type served for output files.
pub const OUTPUT_CONTENT_TYPE: &str = "image/png";

/// Upload extensions accepted when `ALLOWED_EXTENSIONS` is not set.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Requested output size when `IMAGE_SIZE` is not set.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

pub const NANO_GPT_API_KEY_VAR: &str = "NANO_GPT_API_KEY";
pub const DEFAULT_NANO_GPT_API_URL: &str = "https://nano-gpt.com/v1/images/generations";
pub const DEFAULT_NANO_GPT_MODEL: &str = "hidream";

pub const MULTIMODAL_API_KEY_VAR: &str = "MULTIMODAL_API_KEY";
pub const DEFAULT_MULTIMODAL_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MULTIMODAL_MODEL: &str = "google/gemini-2.5-flash-image-preview";
