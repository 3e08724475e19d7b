//! OpenAPI documentation for the JSON endpoints.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use promptpix_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PromptPix API",
        version = "0.1.0",
        description = "Generate images from a text prompt and optional reference images through an external image generation provider, then download the stored result."
    ),
    paths(
        handlers::generate::generate_image,
        handlers::files::download_output,
        handlers::files::serve_output,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::GenerationResult,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "generation", description = "Image generation from prompt and reference images"),
        (name = "files", description = "Generated image delivery"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
