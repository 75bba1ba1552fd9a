//! HTTP client construction and error hints.

use crate::error::ApiError;
use std::time::Duration;

/// Build an HTTP client with timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Add operator hints to common misconfiguration statuses.
pub(super) fn with_diagnostic_hints(err: ApiError) -> ApiError {
    let (code, mut body, retry_after_secs) = match err {
        ApiError::Status {
            code,
            body,
            retry_after_secs,
        } => (code, body, retry_after_secs),
        other => return other,
    };

    match code {
        401 => body.push_str(
            "\nHint: check `api.api_key`, `api.api_key_env`, or THEMEWRIGHT_API_KEY.",
        ),
        404 => body.push_str(
            "\nHint: this endpoint may not serve `/chat/completions`; check `api.base_url` and `api.model`.",
        ),
        _ => {}
    }
    ApiError::status(code, body, retry_after_secs)
}
