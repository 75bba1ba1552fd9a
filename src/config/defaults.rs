//! Default configuration constants.

use crate::theme::ConfigSetting;

/// Embedded `themewright.toml` written by `themewright init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/themewright.toml");
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub(super) const DEFAULT_MODEL_ID: &str = "gpt-4.1-mini";
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 60;
pub(super) const DEFAULT_TURN_TIMEOUT_SECS: u64 = 90;
pub(super) const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";
pub(super) const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub(super) const DEFAULT_WIDGET_NAME: &str = "Gantt";
pub(super) const DEFAULT_SCOPE_SELECTOR: &str = ":root";
pub(super) const DEFAULT_CONFIG_TARGET: &str = "gantt";
pub(super) const DEFAULT_ASSISTANT_NAME: &str = "ProjectGanttAssistant";
pub(super) const DEFAULT_LOG_LEVEL: &str = "info";

/// Stock widget values for the knobs in the built-in config catalog.
///
/// `bar_height` defaults to the string `"full"` in the widget and so has no
/// numeric baseline.
pub(super) fn default_baseline() -> Vec<ConfigSetting> {
    vec![
        ConfigSetting::new("link_line_width", 2),
        ConfigSetting::new("link_radius", 4),
        ConfigSetting::new("row_height", 36),
        ConfigSetting::new("show_progress", true),
    ]
}
