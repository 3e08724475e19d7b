//! Output delivery and page integration tests.
//!
//! Run with: `cargo test -p promptpix-api --test files_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::{fixtures, setup_test_app, TestApp, NANO_GPT_PATH};
use promptpix_api::ErrorResponse;
use promptpix_core::models::GenerationResult;

async fn generate_one(app: &mut TestApp, png: &[u8]) -> String {
    let _mock = app
        .provider
        .mock("POST", NANO_GPT_PATH)
        .with_status(200)
        .with_body(fixtures::nano_gpt_body(png, None))
        .create_async()
        .await;

    let response = app
        .client()
        .post("/generate")
        .multipart(MultipartForm::new().add_text("prompt", "a small red square"))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json::<GenerationResult>().filename
}

#[tokio::test]
async fn test_download_returns_stored_bytes_as_attachment() {
    let mut app = setup_test_app(&[]).await;
    let png = fixtures::png_bytes();
    let filename = generate_one(&mut app, &png).await;

    let response = app
        .client()
        .get(&format!("/download/{}", filename))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/png");
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&filename));
    assert_eq!(response.as_bytes().to_vec(), png);
}

#[tokio::test]
async fn test_output_serves_image_inline() {
    let mut app = setup_test_app(&[]).await;
    let png = fixtures::png_bytes();
    let filename = generate_one(&mut app, &png).await;

    let response = app.client().get(&format!("/output/{}", filename)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/png");
    assert!(response.headers().get("content-disposition").is_none());
    assert_eq!(response.as_bytes().to_vec(), png);
}

#[tokio::test]
async fn test_unknown_file_is_not_found() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get("/download/generated_20200101_000000_deadbeef.png")
        .await;

    assert_eq!(response.status_code(), 404);
    let body: ErrorResponse = response.json();
    assert!(body.error.contains("generated_20200101_000000_deadbeef.png"));
}

#[tokio::test]
async fn test_names_outside_output_pattern_are_not_found() {
    let app = setup_test_app(&[]).await;
    std::fs::write(app.output_path().join("secret.txt"), b"do not serve").unwrap();

    for path in [
        "/download/secret.txt",
        "/output/secret.txt",
        "/download/..%2F..%2Fetc%2Fpasswd",
        "/output/..%2Fsecret.txt",
    ] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 404, "{path}");
    }
}

#[tokio::test]
async fn test_index_page_has_generation_form() {
    let app = setup_test_app(&[]).await;

    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains(r#"name="prompt""#));
    assert!(html.contains(r#"name="images""#));
    assert!(html.contains("/generate"));
    assert!(html.contains(r#"id="drop-zone""#));
    assert!(html.contains("function removeFile"));
}

#[tokio::test]
async fn test_result_page_links_and_escapes_filename() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get("/result")
        .add_query_param("filename", "generated_20240101_120000_deadbeef.png")
        .await;
    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("/output/generated_20240101_120000_deadbeef.png"));
    assert!(html.contains("/download/generated_20240101_120000_deadbeef.png"));

    let response = app
        .client()
        .get("/result")
        .add_query_param("filename", "<script>alert(1)</script>")
        .await;
    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("/output/%3Cscript%3Ealert%281%29%3C%2Fscript%3E"));
}

#[tokio::test]
async fn test_health_reports_provider() {
    let app = setup_test_app(&[("NANO_GPT_API_KEY", "")]).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "nano-gpt");
    assert_eq!(body["model"], "hidream");
    assert_eq!(body["credential_configured"], false);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app(&[]).await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/generate"].is_object());
}
