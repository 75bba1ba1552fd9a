//! HTTP client for OpenAI-compatible chat-completion APIs.
//!
//! - `completions`: the `/chat/completions` request helper
//! - `client`: bearer auth, retry, and the [`ModelClient`] implementation

use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::SystemTime;

mod client;
mod completions;

pub use client::ApiClient;

/// Minimal model API interface used by the assistant.
///
/// Tests provide deterministic mock responses through this trait; production
/// uses [`ApiClient`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// Parse a `Retry-After` header as delta-seconds or an HTTP date.
pub(crate) fn parse_retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(seconds);
    }
    let at = httpdate::parse_http_date(raw).ok()?;
    Some(
        at.duration_since(SystemTime::now())
            .map(|d| d.as_secs())
            .unwrap_or(0),
    )
}
