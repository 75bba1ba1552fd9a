//! Function-calling schemas advertised to the model.
//!
//! Only `set_theme` and `reset_theme` are published; `set_configs` stays an
//! internal editor command.

use super::{RESET_THEME, SET_THEME};
use crate::types::ToolDefinition;

/// Tool definitions for the chat-completion request.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![set_theme_definition(), reset_theme_definition()]
}

fn set_theme_definition() -> ToolDefinition {
    ToolDefinition::function(
        SET_THEME,
        "Update the chart theme. The `variables` parameter MUST contain the entire current \
         theme (all CSS variables), even if only some are changed. Do NOT omit any variables \
         unless the user explicitly requests a full reset. `configs` is an optional list of \
         layout/behavior overrides.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "variables": {
                    "type": "array",
                    "description": "Full list of CSS variables for the current theme. Change only those explicitly mentioned by the user; keep the rest untouched.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "key": {
                                "type": "string",
                                "description": "Name of the CSS variable (e.g. --dhx-gantt-task-background)"
                            },
                            "value": {
                                "type": "string",
                                "description": "Value of the CSS variable (e.g. #e0e0e0)"
                            }
                        },
                        "required": ["key", "value"]
                    },
                    "minItems": 0
                },
                "configs": {
                    "type": "array",
                    "description": "Config settings the user changed or added. Omit entirely if no configs changed.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Name of the config, e.g. 'link_line_width', 'row_height'"
                            },
                            "value": {
                                "type": ["number", "boolean"],
                                "description": "New value for the config (pixels or boolean)"
                            }
                        },
                        "required": ["name", "value"]
                    },
                    "minItems": 0
                }
            },
            "required": ["variables"]
        }),
    )
}

fn reset_theme_definition() -> ToolDefinition {
    ToolDefinition::function(
        RESET_THEME,
        "Reset the current chart theme by clearing all custom CSS variables and configs \
         (back to defaults).",
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    )
}
