//! Multipart parsing for generation requests

use crate::error::app_error_from_multipart;
use axum::extract::Multipart;
use promptpix_core::AppError;
use promptpix_processing::UploadValidator;

const PROMPT_FIELD: &str = "prompt";
const IMAGES_FIELD: &str = "images";

/// Raw uploaded reference image, not yet decoded
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Fields of a `POST /generate` form
pub struct GenerationForm {
    pub prompt: String,
    pub images: Vec<UploadedImage>,
}

/// Read the prompt and accepted image files from the form.
///
/// Image parts without a filename or with a disallowed extension are skipped. Unknown
/// fields are ignored. A missing or blank prompt fails with `MissingPrompt`.
pub async fn extract_generation_form(
    mut multipart: Multipart,
    validator: &UploadValidator,
    max_upload_bytes: usize,
) -> Result<GenerationForm, AppError> {
    let mut prompt: Option<String> = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| app_error_from_multipart(e, max_upload_bytes))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            PROMPT_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| app_error_from_multipart(e, max_upload_bytes))?;
                // First prompt wins.
                prompt.get_or_insert(text);
            }
            IMAGES_FIELD => {
                let filename = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => {
                        tracing::debug!("Skipping image part without filename");
                        continue;
                    }
                };

                if let Err(e) = validator.validate_extension(&filename) {
                    tracing::debug!(filename = %filename, reason = %e, "Skipping disallowed upload");
                    continue;
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| app_error_from_multipart(e, max_upload_bytes))?;

                images.push(UploadedImage {
                    filename,
                    data: data.to_vec(),
                });
            }
            _ => {
                tracing::debug!(field = %field_name, "Ignoring unknown form field");
            }
        }
    }

    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or(AppError::MissingPrompt)?;

    Ok(GenerationForm { prompt, images })
}
