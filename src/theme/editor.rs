//! Parsers for hand-edited theme text.
//!
//! The code editors show the rendered stylesheet and config statements; when
//! the user edits them, the text comes back here and is turned into entries
//! again. Lines that do not look like a declaration are skipped, never
//! treated as an error, so a half-typed edit never wipes the theme.

use super::{ConfigSetting, ConfigValue, ThemeVariable};

/// Extract `--name: value` declarations from stylesheet text.
///
/// Declarations may be separated by `;` or newlines; selectors and braces are
/// ignored.
pub fn parse_css_declarations(text: &str) -> Vec<ThemeVariable> {
    text.split([';', '\n'])
        .filter_map(|chunk| parse_declaration(strip_block_delimiters(chunk)))
        .collect()
}

// `:root { --a: 1` -> `--a: 1`, `--b: 2 }` -> `--b: 2`.
fn strip_block_delimiters(chunk: &str) -> &str {
    let body = chunk.rsplit('{').next().unwrap_or(chunk);
    body.trim().trim_end_matches('}').trim_end()
}

fn parse_declaration(line: &str) -> Option<ThemeVariable> {
    let rest = line.strip_prefix("--")?;
    let (name, value) = rest.split_once(':')?;
    let name = name.trim_end();
    if name.is_empty() || !name.chars().all(is_css_ident_char) {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(ThemeVariable::new(format!("--{name}"), value))
}

fn is_css_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Extract `<target>.config.<name> = <value>;` statements.
///
/// Statements may share a line when separated by `;`. Values must decode as
/// JSON numbers or booleans.
pub fn parse_config_statements(text: &str, config_target: &str) -> Vec<ConfigSetting> {
    let prefix = format!("{config_target}.config.");
    text.split([';', '\n'])
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .filter_map(|statement| {
            let parsed = parse_statement(statement, &prefix);
            if parsed.is_none() {
                tracing::warn!(statement, "skipping unrecognized config statement");
            }
            parsed
        })
        .collect()
}

fn parse_statement(line: &str, prefix: &str) -> Option<ConfigSetting> {
    let rest = line.strip_prefix(prefix)?;
    let (name, raw_value) = rest.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let raw_value = raw_value.trim();
    let value: serde_json::Value = serde_json::from_str(raw_value).ok()?;
    Some(ConfigSetting {
        name: name.to_string(),
        value: ConfigValue::from_json(&value)?,
    })
}
