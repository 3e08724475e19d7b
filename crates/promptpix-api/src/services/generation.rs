//! Generation pipeline: encode uploads, call the provider, store the result.

use crate::error::app_error_from_storage;
use crate::state::AppState;
use crate::utils::upload::{GenerationForm, UploadedImage};
use promptpix_core::models::{EncodedImage, GenerationRequest, GenerationResult, ProviderResponse};
use promptpix_core::AppError;
use promptpix_processing::{decode_image_payload, ImageNormalizer};
use promptpix_storage::OutputStore;
use std::time::Instant;

const SUCCESS_MESSAGE: &str = "Image generated successfully!";

/// Run one generation request end to end and return the result envelope.
pub async fn run_generation(
    state: &AppState,
    form: GenerationForm,
) -> Result<GenerationResult, AppError> {
    let start = Instant::now();
    let images = encode_uploads(form.images).await?;

    let request = GenerationRequest {
        prompt: form.prompt,
        images,
    };

    tracing::info!(
        provider = %state.provider.kind(),
        model = state.provider.model(),
        prompt_chars = request.prompt.chars().count(),
        image_count = request.images.len(),
        "Requesting image generation"
    );

    let response = state.provider.generate(&request).await?;

    let result = materialize(
        state.output_store.as_ref(),
        state.provider.name(),
        state.provider.model(),
        response,
    )
    .await?;

    tracing::info!(
        filename = %result.filename,
        duration_ms = start.elapsed().as_millis() as u64,
        "Image generation completed"
    );

    Ok(result)
}

/// Decode and re-encode uploads as PNG off the async runtime, keeping upload order.
async fn encode_uploads(images: Vec<UploadedImage>) -> Result<Vec<EncodedImage>, AppError> {
    if images.is_empty() {
        return Ok(Vec::new());
    }

    tokio::task::spawn_blocking(move || {
        images
            .iter()
            .map(|image| ImageNormalizer::normalize_upload(&image.filename, &image.data))
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| task_failed(e, "Image encoding"))?
    .map_err(AppError::from)
}

/// Turn the provider's first image into a stored PNG and build the result envelope.
pub async fn materialize(
    store: &dyn OutputStore,
    provider_name: &str,
    model: &str,
    response: ProviderResponse,
) -> Result<GenerationResult, AppError> {
    let payload = response
        .images
        .first()
        .and_then(|image| image.b64.as_deref())
        .filter(|b64| !b64.trim().is_empty())
        .ok_or_else(|| AppError::EmptyResponse("provider returned no image data".to_string()))?;

    let bytes = decode_image_payload(payload)?;

    let png = tokio::task::spawn_blocking(move || ImageNormalizer::ensure_png(bytes))
        .await
        .map_err(|e| task_failed(e, "Image decoding"))??;

    let filename = store.store(png).await.map_err(app_error_from_storage)?;

    Ok(GenerationResult {
        success: true,
        message: success_message(response.cost_display().as_deref()),
        filename,
        prompt_response: prompt_response(response.text.as_deref(), provider_name, model),
    })
}

fn task_failed(err: tokio::task::JoinError, what: &str) -> AppError {
    AppError::from(anyhow::Error::new(err).context(format!("{} task failed", what)))
}

fn success_message(cost: Option<&str>) -> String {
    match cost {
        Some(cost) => format!("{} (cost: {})", SUCCESS_MESSAGE, cost),
        None => SUCCESS_MESSAGE.to_string(),
    }
}

fn prompt_response(text: Option<&str>, provider_name: &str, model: &str) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None => format!("Image generated with {} ({}).", provider_name, model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use promptpix_core::models::ImagePayload;
    use promptpix_core::ErrorMetadata;
    use promptpix_storage::LocalOutputStore;
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    fn response_with(b64: Option<String>) -> ProviderResponse {
        ProviderResponse {
            images: vec![ImagePayload { b64 }],
            cost: None,
            text: None,
        }
    }

    #[test]
    fn message_includes_cost_when_reported() {
        assert_eq!(success_message(None), "Image generated successfully!");
        assert_eq!(
            success_message(Some("0.02")),
            "Image generated successfully! (cost: 0.02)"
        );
    }

    #[test]
    fn prompt_response_prefers_model_text() {
        assert_eq!(
            prompt_response(Some("Here you go"), "Nano-GPT", "hidream"),
            "Here you go"
        );
        assert_eq!(
            prompt_response(Some("  "), "Nano-GPT", "hidream"),
            "Image generated with Nano-GPT (hidream)."
        );
        assert_eq!(
            prompt_response(None, "Nano-GPT", "hidream"),
            "Image generated with Nano-GPT (hidream)."
        );
    }

    #[tokio::test]
    async fn panicked_image_task_keeps_its_cause() {
        let join_err = tokio::spawn(async { panic!("decoder crashed") })
            .await
            .unwrap_err();

        let err = task_failed(join_err, "Image decoding");
        assert!(matches!(err, AppError::InternalWithSource { .. }));
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.detailed_message().contains("Image decoding task failed"));
    }

    #[tokio::test]
    async fn stores_png_payload_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();
        let png = encode(ImageFormat::Png);

        let mut response = response_with(Some(STANDARD.encode(&png)));
        response.cost = Some(serde_json::json!(0.05));

        let result = materialize(&store, "Nano-GPT", "hidream", response)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Image generated successfully! (cost: 0.05)");
        assert_eq!(std::fs::read(dir.path().join(&result.filename)).unwrap(), png);
    }

    #[tokio::test]
    async fn transcodes_data_url_jpeg_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();
        let jpeg = encode(ImageFormat::Jpeg);
        let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg));

        let result = materialize(&store, "multimodal chat model", "m", response_with(Some(payload)))
            .await
            .unwrap();

        let stored = std::fs::read(dir.path().join(&result.filename)).unwrap();
        assert_eq!(image::guess_format(&stored).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn missing_payload_is_empty_response() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        for response in [
            ProviderResponse::default(),
            response_with(None),
            response_with(Some(String::new())),
        ] {
            let err = materialize(&store, "Nano-GPT", "hidream", response)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::EmptyResponse(_)));
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn garbage_payload_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        let err = materialize(&store, "Nano-GPT", "hidream", response_with(Some("%%%".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedImagePayload(_)));

        let not_an_image = STANDARD.encode(b"hello world");
        let err = materialize(&store, "Nano-GPT", "hidream", response_with(Some(not_an_image)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedImagePayload(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
