use crate::error::{extract_error_message, ProviderError};
use promptpix_core::ProviderKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// POST `body` as JSON with bearer auth and parse a 2xx JSON answer.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    provider: ProviderKind,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<R, ProviderError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let start = Instant::now();

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(
                provider = %provider,
                error = %e,
                duration_ms = start.elapsed().as_millis() as u64,
                "Provider request failed"
            );
            ProviderError::from(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = extract_error_message(status.as_u16(), &text);
        tracing::warn!(
            provider = %provider,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            message = %message,
            "Provider returned an error"
        );
        return Err(ProviderError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    let parsed = serde_json::from_slice::<R>(&bytes).map_err(|e| {
        ProviderError::InvalidResponse(format!("failed to parse provider response: {}", e))
    })?;

    tracing::info!(
        provider = %provider,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Provider request completed"
    );

    Ok(parsed)
}
