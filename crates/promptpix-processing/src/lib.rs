//! PromptPix Processing Library
//!
//! Image handling on both sides of a provider call: validating and normalizing
//! uploaded reference images, and turning the provider's encoded output back into
//! PNG bytes ready to be stored.

pub mod error;
pub mod image;
pub mod payload;
pub mod validator;

pub use error::ProcessingError;
pub use image::ImageNormalizer;
pub use payload::decode_image_payload;
pub use validator::{UploadValidator, ValidationError};
