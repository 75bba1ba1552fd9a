//! One `/chat/completions` exchange, without retries.

use crate::api::parse_retry_after_secs;
use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};

fn endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// POST `body` and decode the completion. Non-2xx answers keep their body
/// and `Retry-After` hint for the retry policy.
pub(crate) async fn request(
    http: &reqwest::Client,
    base_url: &str,
    body: &ChatRequest,
    api_key: Option<&str>,
) -> Result<ChatResponse, ApiError> {
    let builder = http.post(endpoint(base_url)).json(body);
    let builder = match api_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => builder.bearer_auth(key),
        None => builder,
    };

    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        let retry_after = parse_retry_after_secs(response.headers());
        let detail = response.text().await.unwrap_or_default();
        return Err(ApiError::status(status.as_u16(), detail, retry_after));
    }

    let payload = response.text().await?;
    serde_json::from_str(&payload)
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected completion payload: {e}")))
}
