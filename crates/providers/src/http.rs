//! Shared HTTP plumbing for the hosted providers.

use patternlab_core::error::ProviderError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Seconds to wait on a 429 that carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// POST `body` as JSON and decode a successful reply into `T`.
///
/// Non-success statuses map onto [`ProviderError`] variants.
pub(crate) async fn post_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
    provider: &str,
) -> Result<T, ProviderError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let retry_after = retry_after_secs(response.headers());
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, retry_after, body, provider));
    }

    response.json().await.map_err(|e| ProviderError::ApiError {
        status_code: status.as_u16(),
        message: format!("Failed to parse {provider} response: {e}"),
    })
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn status_error(status: StatusCode, retry_after: u64, body: String, provider: &str) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            retry_after_secs: retry_after,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationFailed(
            format!("{provider} rejected the API key (status {})", status.as_u16()),
        ),
        _ => {
            warn!(provider, status = status.as_u16(), body = %body, "Provider returned error");
            ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            }
        }
    }
}
