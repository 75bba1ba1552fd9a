//! Wire types for the chat-completion boundary.
//!
//! Only the slice of the Chat Completions schema a theming turn needs: a
//! system/user message pair with two function tools going out, and one
//! assistant message (text, tool calls, usage) coming back. Local servers
//! often leave fields out, so the response side defaults generously.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// `null` when the assistant only called a tool.
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolInvocation>>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }
}

/// A function call emitted by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Arguments object as JSON text; empty when the server omitted it.
    #[serde(default)]
    pub arguments: String,
}

/// A function tool offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: function_kind(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// `Some(false)` asks for at most one call per reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Message of the first choice; later choices are never used.
    pub fn into_first_message(self) -> Option<Message> {
        self.choices.into_iter().next().map(|choice| choice.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_theming_turn() {
        let req = ChatRequest {
            model: "gpt-4.1-mini".into(),
            messages: vec![Message::system("rules"), Message::user("Make it darker")],
            tools: Some(vec![ToolDefinition::function(
                "reset_theme",
                "Reset",
                json!({"type": "object", "properties": {}}),
            )]),
            parallel_tool_calls: Some(false),
            temperature: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "Make it darker"}));
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "reset_theme");
        assert_eq!(value["parallel_tool_calls"], false);
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn first_message_carries_set_theme_call() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "set_theme",
                                "arguments": "{\"variables\":[]}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                },
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 120, "completion_tokens": 9, "total_tokens": 129}
        }))
        .unwrap();
        assert_eq!(resp.usage.as_ref().map(|u| u.total_tokens), Some(129));
        let message = resp.into_first_message().unwrap();
        assert!(message.content.is_none());
        let call = &message.tool_calls.unwrap()[0];
        assert_eq!(call.function.name, "set_theme");
        assert_eq!(call.function.arguments, "{\"variables\":[]}");
    }

    #[test]
    fn sparse_local_server_reply_still_decodes() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "ok",
                    "tool_calls": [{"function": {"name": "reset_theme"}}]
                }
            }]
        }))
        .unwrap();
        assert!(resp.usage.is_none());
        let message = resp.into_first_message().unwrap();
        let call = &message.tool_calls.unwrap()[0];
        assert_eq!(call.call_type, "function");
        assert!(call.function.arguments.is_empty());
    }

    #[test]
    fn missing_choices_means_no_message() {
        let resp: ChatResponse = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert!(resp.into_first_message().is_none());
    }
}
