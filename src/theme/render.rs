//! Text artifacts handed to the UI boundary: a stylesheet block for the theme
//! and assignment statements for the widget config.

use super::{ConfigSnapshot, ThemeSnapshot};

/// Where rendered artifacts point inside the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// CSS selector wrapping the variable declarations.
    pub scope_selector: String,
    /// Name of the widget object whose `.config` receives settings.
    pub config_target: String,
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self {
            scope_selector: ":root".to_string(),
            config_target: "gantt".to_string(),
        }
    }
}

/// Render the theme as `key: value;` declarations inside one scope block.
pub fn render_style(theme: &ThemeSnapshot, target: &RenderTarget) -> String {
    let mut out = format!("{} {{\n", target.scope_selector);
    for variable in theme {
        out.push_str(&format!("  {}: {};\n", variable.key, variable.value));
    }
    out.push('}');
    out
}

/// Render the config as `<target>.config.<name> = <value>;` statements.
pub fn render_config_text(config: &ConfigSnapshot, target: &RenderTarget) -> String {
    config
        .iter()
        .map(|setting| {
            format!(
                "{}.config.{} = {};",
                target.config_target, setting.name, setting.value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ConfigSetting, ThemeVariable};

    #[test]
    fn style_block_wraps_all_declarations() {
        let theme = ThemeSnapshot::from_entries([
            ThemeVariable::new("--dhx-gantt-task-background", "#3db9d3"),
            ThemeVariable::new("--dhx-gantt-font-size", "14px"),
        ]);
        assert_eq!(
            render_style(&theme, &RenderTarget::default()),
            ":root {\n  --dhx-gantt-task-background: #3db9d3;\n  --dhx-gantt-font-size: 14px;\n}"
        );
    }

    #[test]
    fn empty_theme_renders_empty_block() {
        assert_eq!(
            render_style(&ThemeSnapshot::new(), &RenderTarget::default()),
            ":root {\n}"
        );
    }

    #[test]
    fn config_statements_use_target_name() {
        let config = ConfigSnapshot::from_entries([
            ConfigSetting::new("row_height", 45),
            ConfigSetting::new("show_progress", false),
        ]);
        let target = RenderTarget {
            config_target: "chart".to_string(),
            ..RenderTarget::default()
        };
        assert_eq!(
            render_config_text(&config, &target),
            "chart.config.row_height = 45;\nchart.config.show_progress = false;"
        );
    }
}
