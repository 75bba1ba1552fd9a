//! Tool-call protocol between the model and the theme engine.
//!
//! The model may only call `set_theme` or `reset_theme`. A third command,
//! `set_configs`, is synthesized by the editor live-preview path and is never
//! advertised to the model. Everything that crosses this boundary is decoded
//! into the closed [`ToolCall`] enum or rejected with a [`ProtocolError`];
//! nothing is ever partially applied.

use crate::error::ProtocolError;
use crate::theme::{ConfigSetting, ConfigValue, ThemeVariable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod schema;

pub use schema::tool_definitions;

pub const SET_THEME: &str = "set_theme";
pub const RESET_THEME: &str = "reset_theme";
pub const SET_CONFIGS: &str = "set_configs";

/// Command name as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    SetTheme,
    ResetTheme,
    SetConfigs,
    Unrecognized(String),
}

impl CommandName {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            SET_THEME => Self::SetTheme,
            RESET_THEME => Self::ResetTheme,
            SET_CONFIGS => Self::SetConfigs,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// A validated command ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// Replace/extend the theme; `configs` is `None` when the model did not
    /// touch configuration.
    SetTheme {
        variables: Vec<ThemeVariable>,
        configs: Option<Vec<ConfigSetting>>,
    },
    /// Drop the theme and restore the baseline config.
    ResetTheme,
    /// Live config preview from the editor.
    SetConfigs { configs: Vec<ConfigSetting> },
}

impl ToolCall {
    /// Wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTheme { .. } => SET_THEME,
            Self::ResetTheme => RESET_THEME,
            Self::SetConfigs { .. } => SET_CONFIGS,
        }
    }

    /// Decode and validate a command from its name and JSON parameters.
    pub fn from_parts(name: &str, params: &Value) -> Result<Self, ProtocolError> {
        let empty = Map::new();
        let params = match params {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ProtocolError::MalformedToolCall(format!(
                    "params must be an object, got {}",
                    json_type_name(other)
                )))
            }
        };

        match CommandName::parse(name) {
            CommandName::SetTheme => {
                let variables = match params.get("variables") {
                    None | Some(Value::Null) => {
                        return Err(ProtocolError::MalformedToolCall(
                            "`variables` is required".to_string(),
                        ))
                    }
                    Some(value) => decode_variables(value)?,
                };
                let configs = match params.get("configs") {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(decode_configs(value)?),
                };
                Ok(Self::SetTheme { variables, configs })
            }
            CommandName::ResetTheme => Ok(Self::ResetTheme),
            CommandName::SetConfigs => match params.get("configs") {
                None | Some(Value::Null) => Err(ProtocolError::MalformedToolCall(
                    "`configs` is required".to_string(),
                )),
                Some(value) => Ok(Self::SetConfigs {
                    configs: decode_configs(value)?,
                }),
            },
            CommandName::Unrecognized(name) => {
                tracing::warn!(cmd = %name, "unrecognized command");
                Err(ProtocolError::UnknownCommand(name))
            }
        }
    }

    /// Decode a call from the model's function name and JSON argument text.
    pub fn from_function(name: &str, arguments: &str) -> Result<Self, ProtocolError> {
        let params = if arguments.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(arguments).map_err(|e| {
                ProtocolError::ParseFailure(format!("tool arguments are not valid JSON: {e}"))
            })?
        };
        Self::from_parts(name, &params)
    }

    /// JSON parameters for the wire envelope.
    pub fn params(&self) -> Value {
        match self {
            Self::SetTheme { variables, configs } => {
                let mut params = Map::new();
                params.insert("variables".to_string(), serde_json::json!(variables));
                if let Some(configs) = configs {
                    params.insert("configs".to_string(), serde_json::json!(configs));
                }
                Value::Object(params)
            }
            Self::ResetTheme => Value::Object(Map::new()),
            Self::SetConfigs { configs } => serde_json::json!({ "configs": configs }),
        }
    }

    pub fn to_envelope(&self) -> CommandEnvelope {
        CommandEnvelope {
            cmd: self.name().to_string(),
            params: self.params(),
        }
    }
}

/// Wire form of a call: `{ "cmd": ..., "params": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub cmd: String,
    #[serde(default)]
    pub params: Value,
}

impl CommandEnvelope {
    /// Parse envelope text. Any decoding problem is a `ParseFailure`.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text)
            .map_err(|e| ProtocolError::ParseFailure(format!("invalid command envelope: {e}")))
    }

    /// Parse envelope bytes, rejecting invalid UTF-8 up front.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ProtocolError::ParseFailure(format!("envelope is not UTF-8: {e}")))?;
        Self::decode(text)
    }

    /// Compact JSON text.
    pub fn encode(&self) -> String {
        serde_json::json!({ "cmd": self.cmd, "params": self.params }).to_string()
    }

    /// Validate into a dispatchable call.
    pub fn into_call(self) -> Result<ToolCall, ProtocolError> {
        ToolCall::from_parts(&self.cmd, &self.params)
    }
}

/// Parse and validate envelope text in one step.
pub fn decode_call(text: &str) -> Result<ToolCall, ProtocolError> {
    CommandEnvelope::decode(text)?.into_call()
}

fn decode_variables(value: &Value) -> Result<Vec<ThemeVariable>, ProtocolError> {
    let items = value.as_array().ok_or_else(|| {
        ProtocolError::MalformedToolCall(format!(
            "`variables` must be an array, got {}",
            json_type_name(value)
        ))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let entry = entry_object("variables", idx, item)?;
            let key = required_string("variables", idx, entry, "key")?;
            let value = match entry.get("value") {
                Some(Value::String(text)) => text.clone(),
                Some(other) => {
                    return Err(ProtocolError::MalformedToolCall(format!(
                        "variables[{idx}].value must be a string, got {}",
                        json_type_name(other)
                    )))
                }
                None => {
                    return Err(ProtocolError::MalformedToolCall(format!(
                        "variables[{idx}] is missing `value`"
                    )))
                }
            };
            Ok(ThemeVariable { key, value })
        })
        .collect()
}

fn decode_configs(value: &Value) -> Result<Vec<ConfigSetting>, ProtocolError> {
    let items = value.as_array().ok_or_else(|| {
        ProtocolError::MalformedToolCall(format!(
            "`configs` must be an array, got {}",
            json_type_name(value)
        ))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let entry = entry_object("configs", idx, item)?;
            let name = required_string("configs", idx, entry, "name")?;
            let raw = entry.get("value").ok_or_else(|| {
                ProtocolError::MalformedToolCall(format!("configs[{idx}] is missing `value`"))
            })?;
            let value = ConfigValue::from_json(raw).ok_or_else(|| {
                ProtocolError::MalformedToolCall(format!(
                    "configs[{idx}].value must be a number or boolean, got {}",
                    json_type_name(raw)
                ))
            })?;
            Ok(ConfigSetting { name, value })
        })
        .collect()
}

fn entry_object<'a>(
    field: &str,
    idx: usize,
    item: &'a Value,
) -> Result<&'a Map<String, Value>, ProtocolError> {
    item.as_object().ok_or_else(|| {
        ProtocolError::MalformedToolCall(format!(
            "{field}[{idx}] must be an object, got {}",
            json_type_name(item)
        ))
    })
}

fn required_string(
    field: &str,
    idx: usize,
    entry: &Map<String, Value>,
    name: &str,
) -> Result<String, ProtocolError> {
    match entry.get(name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_)) => Err(ProtocolError::MalformedToolCall(format!(
            "{field}[{idx}].{name} must not be empty"
        ))),
        Some(other) => Err(ProtocolError::MalformedToolCall(format!(
            "{field}[{idx}].{name} must be a string, got {}",
            json_type_name(other)
        ))),
        None => Err(ProtocolError::MalformedToolCall(format!(
            "{field}[{idx}] is missing `{name}`"
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
