//! API client for OpenAI-compatible chat completions.
//!
//! - dispatch wiring and error hints are delegated to `transport`.
//! - retry policy logic is delegated to `retry`.

mod retry;
mod transport;

use super::completions;
use super::ModelClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use retry::RetryPolicy;
use std::time::Duration;
use tokio::time::sleep;

/// Client for OpenAI-compatible model APIs.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig) -> Self {
        Self::new_with_retry_policy(
            config,
            Duration::from_secs(config.timeout_secs.max(1)),
            RetryPolicy::default(),
        )
    }

    fn new_with_retry_policy(
        config: &ApiConfig,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http: transport::build_http_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            retry_policy,
        }
    }

    /// Send a chat request, retrying transient failures per the policy.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let bearer = Some(self.api_key.as_str()).filter(|key| !key.is_empty());
        let mut attempt: u32 = 0;
        loop {
            match completions::request(&self.http, &self.base_url, request, bearer).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !self.retry_policy.should_retry(&err, attempt) {
                        return Err(transport::with_diagnostic_hints(err));
                    }
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "model request failed; retrying"
                    );
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl ModelClient for ApiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        ApiClient::chat(self, request).await
    }
}
