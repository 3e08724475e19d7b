//! Test fixtures: small encoded images and provider response bodies.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::json;
use std::io::Cursor;

fn encode(format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 30, 30])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn png_bytes() -> Vec<u8> {
    encode(ImageFormat::Png)
}

pub fn jpeg_bytes() -> Vec<u8> {
    encode(ImageFormat::Jpeg)
}

/// Nano-GPT success body carrying `image` as `b64_json`.
pub fn nano_gpt_body(image: &[u8], cost: Option<f64>) -> String {
    let mut body = json!({ "data": [{ "b64_json": STANDARD.encode(image) }] });
    if let Some(cost) = cost {
        body["cost"] = json!(cost);
    }
    body.to_string()
}

/// Chat completion body with one data-URL image and a text reply.
pub fn chat_body(image: &[u8], mime: &str, text: &str) -> String {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": text,
                "images": [{
                    "type": "image_url",
                    "image_url": { "url": format!("data:{};base64,{}", mime, STANDARD.encode(image)) }
                }]
            }
        }],
        "usage": { "cost": 0.039 }
    })
    .to_string()
}
