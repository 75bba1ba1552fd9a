//! Configuration data model.
//!
//! Struct definitions and default values only; precedence and environment
//! resolution live in `config::mod`.

use crate::theme::{ConfigSetting, ConfigSnapshot, RenderTarget};
use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    default_baseline, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_ASSISTANT_NAME,
    DEFAULT_CONFIG_TARGET, DEFAULT_CORS_ORIGIN, DEFAULT_LOG_LEVEL, DEFAULT_MODEL_ID,
    DEFAULT_SCOPE_SELECTOR, DEFAULT_SERVER_ADDR, DEFAULT_TURN_TIMEOUT_SECS, DEFAULT_WIDGET_NAME,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    pub catalog: CatalogConfig,
    pub prompt: PromptConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

/// Model API connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Literal key. Ignored when `api_key_env` names a variable.
    pub api_key: String,
    /// Name of an environment variable holding the key.
    pub api_key_env: Option<String>,
    pub model: String,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Upper bound on one whole chat turn, retries included.
    pub turn_timeout_secs: u64,
    pub temperature: Option<f64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            api_key_env: None,
            model: DEFAULT_MODEL_ID.into(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

/// HTTP boundary settings for `themewright serve`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    /// Allowed browser origin; `*` allows any.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_SERVER_ADDR.into(),
            cors_origin: DEFAULT_CORS_ORIGIN.into(),
        }
    }
}

/// Describes the chart widget being themed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Human-readable widget name used in the prompt.
    pub name: String,
    /// Live default config values; restored on every reset.
    pub baseline: Vec<ConfigSetting>,
    /// CSS selector wrapping the rendered theme block.
    pub scope_selector: String,
    /// Object whose `config` receives rendered settings.
    pub config_target: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_WIDGET_NAME.into(),
            baseline: default_baseline(),
            scope_selector: DEFAULT_SCOPE_SELECTOR.into(),
            config_target: DEFAULT_CONFIG_TARGET.into(),
        }
    }
}

impl WidgetConfig {
    pub fn baseline_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::from_entries(self.baseline.iter().cloned())
    }

    pub fn render_target(&self) -> RenderTarget {
        RenderTarget {
            scope_selector: self.scope_selector.clone(),
            config_target: self.config_target.clone(),
        }
    }
}

/// Optional replacement catalog files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub variables: Option<PathBuf>,
    pub configs: Option<PathBuf>,
}

/// Prompt customization.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub assistant_name: String,
    /// Extra operator instructions appended to the system prompt.
    pub instructions: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.into(),
            instructions: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

/// Terminal rendering preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Result of `themewright init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}
