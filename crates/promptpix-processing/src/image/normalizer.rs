use crate::error::ProcessingError;
use image::{DynamicImage, ImageFormat, ImageReader};
use promptpix_core::constants::OUTPUT_CONTENT_TYPE;
use promptpix_core::models::EncodedImage;
use std::io::Cursor;

/// Decodes arbitrary raster input and re-encodes it as 8-bit PNG.
pub struct ImageNormalizer;

impl ImageNormalizer {
    /// Decode an uploaded file and re-encode it as PNG.
    ///
    /// The format is guessed from content, not from the filename. Images with an alpha
    /// channel become RGBA8, everything else RGB8.
    pub fn normalize_upload(filename: &str, data: &[u8]) -> Result<EncodedImage, ProcessingError> {
        let img = Self::decode(data).map_err(|reason| ProcessingError::InvalidImage {
            filename: filename.to_string(),
            reason,
        })?;

        let (width, height) = (img.width(), img.height());
        let png = Self::encode_png(&Self::to_8bit(img))?;

        tracing::debug!(
            filename = %filename,
            width = width,
            height = height,
            input_bytes = data.len(),
            output_bytes = png.len(),
            "Normalized uploaded image"
        );

        Ok(EncodedImage {
            data: png,
            content_type: OUTPUT_CONTENT_TYPE.to_string(),
            filename: filename.to_string(),
        })
    }

    /// Return PNG bytes for provider output.
    ///
    /// PNG input is returned unchanged; other decodable formats are transcoded.
    pub fn ensure_png(data: Vec<u8>) -> Result<Vec<u8>, ProcessingError> {
        match image::guess_format(&data) {
            Ok(ImageFormat::Png) => Ok(data),
            Ok(format) => {
                let img = Self::decode(&data).map_err(ProcessingError::MalformedPayload)?;
                tracing::debug!(format = ?format, "Transcoding provider output to PNG");
                Self::encode_png(&Self::to_8bit(img))
            }
            Err(e) => Err(ProcessingError::MalformedPayload(format!(
                "unrecognized image data: {}",
                e
            ))),
        }
    }

    fn decode(data: &[u8]) -> Result<DynamicImage, String> {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| e.to_string())?
            .decode()
            .map_err(|e| e.to_string())
    }

    fn to_8bit(img: DynamicImage) -> DynamicImage {
        if img.color().has_alpha() {
            DynamicImage::ImageRgba8(img.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        }
    }

    fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
