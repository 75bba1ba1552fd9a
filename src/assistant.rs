//! One model round-trip per inbound chat message.
//!
//! The assistant is stateless: everything it needs about the current theme
//! arrives in the [`InboundMessage`]. It builds the prompt, calls the model
//! with the two published tools, and validates the first tool call into an
//! envelope the caller can apply.

use crate::api::ModelClient;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::TurnError;
use crate::prompt::{build_messages, today_label, PromptParams};
use crate::protocol::{tool_definitions, ToolCall};
use crate::theme::{ConfigSetting, ConfigSnapshot, ThemeSnapshot, ThemeVariable};
use crate::types::ChatRequest;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Chat message plus the UI's current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message: String,
    #[serde(default)]
    pub theme: Vec<ThemeVariable>,
    #[serde(default)]
    pub configs: Vec<ConfigSetting>,
}

/// Assistant reply. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_msg: Option<String>,
    /// Envelope JSON text: `{"cmd": ..., "params": {...}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
}

impl OutboundReply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            assistant_msg: Some(message.into()),
            call: None,
        }
    }
}

/// Static settings for building requests.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub model: String,
    pub temperature: Option<f64>,
    pub assistant_name: String,
    pub widget_name: String,
    pub config_target: String,
    pub custom_instructions: Option<String>,
    /// Bound on the whole model call, retries included.
    pub turn_timeout: Duration,
}

impl AssistantSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.api.model.clone(),
            temperature: config.api.temperature,
            assistant_name: config.prompt.assistant_name.clone(),
            widget_name: config.widget.name.clone(),
            config_target: config.widget.config_target.clone(),
            custom_instructions: Some(config.prompt.instructions.clone())
                .filter(|text| !text.trim().is_empty()),
            turn_timeout: Duration::from_secs(config.api.turn_timeout_secs.max(1)),
        }
    }
}

pub struct Assistant {
    client: Box<dyn ModelClient>,
    catalog: Catalog,
    settings: AssistantSettings,
}

impl Assistant {
    pub fn new(client: Box<dyn ModelClient>, catalog: Catalog, settings: AssistantSettings) -> Self {
        Self {
            client,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one round-trip for `inbound`.
    pub async fn reply(&self, inbound: &InboundMessage) -> Result<OutboundReply, TurnError> {
        self.reply_at(inbound, SystemTime::now()).await
    }

    async fn reply_at(
        &self,
        inbound: &InboundMessage,
        now: SystemTime,
    ) -> Result<OutboundReply, TurnError> {
        let theme = ThemeSnapshot::from_entries(inbound.theme.iter().cloned());
        let config = ConfigSnapshot::from_entries(inbound.configs.iter().cloned());
        let today = today_label(now);
        let params = PromptParams {
            catalog: &self.catalog,
            theme: &theme,
            config: &config,
            assistant_name: &self.settings.assistant_name,
            widget_name: &self.settings.widget_name,
            config_target: &self.settings.config_target,
            today: &today,
            custom_instructions: self.settings.custom_instructions.as_deref(),
        };
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: build_messages(&params, &inbound.message),
            tools: Some(tool_definitions()),
            parallel_tool_calls: Some(false),
            temperature: self.settings.temperature,
        };

        tracing::info!(
            model = %request.model,
            theme_entries = theme.len(),
            config_entries = config.len(),
            "sending chat turn to model"
        );
        let response = tokio::time::timeout(self.settings.turn_timeout, self.client.chat(&request))
            .await
            .map_err(|_| TurnError::UpstreamTimeout)??;

        if let Some(usage) = &response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "model turn finished"
            );
        }

        let message = response
            .into_first_message()
            .ok_or(TurnError::EmptyResponse)?;
        let mut assistant_msg = message.content.filter(|text| !text.trim().is_empty());

        let invocations = message.tool_calls.unwrap_or_default();
        if invocations.len() > 1 {
            tracing::warn!(
                count = invocations.len(),
                "model returned several tool calls; applying only the first"
            );
        }
        let Some(invocation) = invocations.into_iter().next() else {
            return Ok(OutboundReply {
                assistant_msg,
                call: None,
            });
        };

        tracing::info!(tool = %invocation.function.name, "tool call received");
        match ToolCall::from_function(&invocation.function.name, &invocation.function.arguments) {
            Ok(call) => {
                self.log_uncatalogued_keys(&call);
                Ok(OutboundReply {
                    assistant_msg,
                    call: Some(call.to_envelope().encode()),
                })
            }
            Err(err) => {
                tracing::warn!(
                    tool = %invocation.function.name,
                    error = %err,
                    "rejected tool call from model"
                );
                let explanation = err.user_message();
                assistant_msg = Some(match assistant_msg {
                    Some(text) => format!("{text}\n\n{explanation}"),
                    None => explanation,
                });
                Ok(OutboundReply {
                    assistant_msg,
                    call: None,
                })
            }
        }
    }

    /// Keys and names missing from the catalog. The call is applied
    /// regardless.
    fn log_uncatalogued_keys(&self, call: &ToolCall) -> Vec<String> {
        let (variables, configs) = match call {
            ToolCall::SetTheme { variables, configs } => {
                (variables.as_slice(), configs.as_deref().unwrap_or_default())
            }
            ToolCall::SetConfigs { configs } => (&[][..], configs.as_slice()),
            ToolCall::ResetTheme => return Vec::new(),
        };
        let unknown: Vec<String> = variables
            .iter()
            .map(|v| v.key.as_str())
            .filter(|key| !self.catalog.has_variable(key))
            .chain(
                configs
                    .iter()
                    .map(|c| c.name.as_str())
                    .filter(|name| !self.catalog.has_config(name)),
            )
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            tracing::debug!(keys = ?unknown, "tool call uses keys outside the catalog");
        }
        unknown
    }
}
