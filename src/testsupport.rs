//! Shared test fixtures.

use crate::api::ModelClient;
use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse, Choice, FunctionCall, Message, Role, ToolInvocation};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("themewright-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Assistant response carrying plain text only.
pub fn text_response(text: &str) -> ChatResponse {
    response_with(Message {
        role: Role::Assistant,
        content: Some(text.to_string()),
        tool_calls: None,
    })
}

/// Assistant response carrying one function call.
pub fn tool_response(text: Option<&str>, name: &str, arguments: &str) -> ChatResponse {
    response_with(Message {
        role: Role::Assistant,
        content: text.map(str::to_string),
        tool_calls: Some(vec![ToolInvocation {
            id: "call_1".to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }]),
    })
}

fn response_with(message: Message) -> ChatResponse {
    ChatResponse {
        id: "chatcmpl-test".to_string(),
        choices: vec![Choice {
            index: 0,
            message,
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

/// Model client that replays queued results and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: impl IntoIterator<Item = Result<ChatResponse, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("mutex poisoned").clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.requests
            .lock()
            .expect("mutex poisoned")
            .push(request.clone());
        self.responses
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("(script exhausted)")))
    }
}

// Lets a test keep a handle for inspecting requests after boxing the client.
#[async_trait]
impl ModelClient for Arc<ScriptedClient> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.as_ref().chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().exists());
    }

    #[tokio::test]
    async fn scripted_client_replays_in_order() {
        let client = ScriptedClient::new([
            Ok(text_response("first")),
            Ok(tool_response(None, "reset_theme", "{}")),
        ]);
        let request = ChatRequest {
            model: "m".into(),
            messages: vec![Message::user("hi")],
            tools: None,
            parallel_tool_calls: None,
            temperature: None,
        };
        let first = client.chat(&request).await.unwrap();
        assert_eq!(first.choices[0].message.content.as_deref(), Some("first"));
        let second = client.chat(&request).await.unwrap();
        assert!(second.choices[0].message.tool_calls.is_some());
        assert_eq!(client.requests().len(), 2);
    }
}
