//! System prompt templating.
//!
//! The instruction text lives in one template file and is rendered from a
//! single code path. Rendering is pure: the caller supplies the catalog, the
//! session's current snapshots, and today's date.

use crate::catalog::Catalog;
use crate::theme::{ConfigSnapshot, ThemeSnapshot};
use crate::types::Message;
use std::collections::BTreeMap;
use std::time::SystemTime;

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("templates/system_prompt.template");

/// Marker rendered in place of an empty snapshot.
const EMPTY_SNAPSHOT: &str = "(none)";

/// Parameters used to compile the system prompt template.
#[derive(Clone, Debug)]
pub struct PromptParams<'a> {
    pub catalog: &'a Catalog,
    pub theme: &'a ThemeSnapshot,
    pub config: &'a ConfigSnapshot,
    pub assistant_name: &'a str,
    pub widget_name: &'a str,
    pub config_target: &'a str,
    /// Human-readable date, see [`today_label`].
    pub today: &'a str,
    pub custom_instructions: Option<&'a str>,
}

/// Render the system instruction.
pub fn render_system_prompt(params: &PromptParams<'_>) -> String {
    let mut vars = BTreeMap::<&str, String>::new();
    vars.insert("ASSISTANT_NAME", params.assistant_name.to_string());
    vars.insert("WIDGET_NAME", params.widget_name.to_string());
    vars.insert("CONFIG_TARGET", params.config_target.to_string());
    vars.insert("TODAY", params.today.to_string());
    vars.insert("VARIABLE_CATALOG", render_variable_catalog(params.catalog));
    vars.insert("CONFIG_CATALOG", render_config_catalog(params.catalog));
    vars.insert("CURRENT_THEME", render_current_theme(params.theme));
    vars.insert("CURRENT_CONFIGS", render_current_configs(params.config));
    vars.insert(
        "CUSTOM_INSTRUCTIONS_BLOCK",
        render_custom_instructions(params.custom_instructions),
    );

    normalize_blank_lines(&render_template(SYSTEM_PROMPT_TEMPLATE, &vars))
}

/// The `[system, user]` message pair for one turn.
pub fn build_messages(params: &PromptParams<'_>, user_message: &str) -> Vec<Message> {
    vec![
        Message::system(render_system_prompt(params)),
        Message::user(user_message),
    ]
}

/// Date label such as `Sat, 17 Oct 2026`.
pub fn today_label(now: SystemTime) -> String {
    let full = httpdate::fmt_http_date(now);
    full.get(..16).unwrap_or(&full).to_string()
}

// Single pass, so placeholder-looking text inside substituted values (theme
// values come from users) is never expanded.
fn render_template(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if vars.contains_key(&after[..end]) => {
                rendered.push_str(&vars[&after[..end]]);
                rest = &after[end + 2..];
            }
            _ => {
                rendered.push_str("{{");
                rest = after;
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

fn render_variable_catalog(catalog: &Catalog) -> String {
    catalog
        .variables()
        .iter()
        .map(|v| format!("{}: {}", v.name, v.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_config_catalog(catalog: &Catalog) -> String {
    catalog
        .configs()
        .iter()
        .map(|c| format!("{}: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_current_theme(theme: &ThemeSnapshot) -> String {
    if theme.is_empty() {
        return EMPTY_SNAPSHOT.to_string();
    }
    theme
        .iter()
        .map(|v| format!("{}: {}", v.key, v.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_current_configs(config: &ConfigSnapshot) -> String {
    if config.is_empty() {
        return EMPTY_SNAPSHOT.to_string();
    }
    config
        .iter()
        .map(|c| format!("{}: {}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_custom_instructions(custom: Option<&str>) -> String {
    let Some(custom) = custom.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };
    format!("Additional operator instructions:\n{custom}")
}

fn normalize_blank_lines(text: &str) -> String {
    let mut out = String::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let is_blank = line.trim().is_empty();
        if is_blank && previous_blank {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line.trim_end());
        previous_blank = is_blank;
    }

    out.trim().to_string()
}
