//! Theme and configuration snapshot model.
//!
//! A snapshot is an ordered list of overrides with unique keys. Every
//! constructor funnels through the merge engine so the uniqueness invariant
//! holds no matter where entries come from (model output, UI payloads, or
//! editor text).

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod editor;
pub mod merge;
pub mod render;

pub use merge::{merge_config, merge_theme, reset_config, reset_theme};
pub use render::{render_config_text, render_style, RenderTarget};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One active styling override (a CSS custom property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeVariable {
    /// Variable name, e.g. `--dhx-gantt-task-background`.
    pub key: String,
    /// CSS value, e.g. `#e0e0e0`.
    pub value: String,
}

impl ThemeVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value of a behavioral configuration knob.
///
/// Numbers keep their JSON text form so `30` renders as `30` and `4.5` as
/// `4.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
}

impl ConfigValue {
    /// Interpret a JSON value as a config value; strings, arrays and objects
    /// are rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(flag) => Some(Self::Bool(*flag)),
            serde_json::Value::Number(number) => Some(Self::Number(number.clone())),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// One active configuration override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSetting {
    /// Config name, e.g. `row_height`.
    pub name: String,
    pub value: ConfigValue,
}

impl ConfigSetting {
    pub fn new(name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Entries addressable by a unique key inside a snapshot.
pub trait Keyed {
    fn entry_key(&self) -> &str;
}

impl Keyed for ThemeVariable {
    fn entry_key(&self) -> &str {
        &self.key
    }
}

impl Keyed for ConfigSetting {
    fn entry_key(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Complete set of active style-variable overrides at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ThemeVariable>", into = "Vec<ThemeVariable>")]
pub struct ThemeSnapshot {
    entries: Vec<ThemeVariable>,
}

/// Complete set of active behavioral-setting overrides at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ConfigSetting>", into = "Vec<ConfigSetting>")]
pub struct ConfigSnapshot {
    entries: Vec<ConfigSetting>,
}

impl ThemeSnapshot {
    /// Empty theme (no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from arbitrary entries; later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = ThemeVariable>) -> Self {
        let incoming: Vec<ThemeVariable> = entries.into_iter().collect();
        merge_theme(&Self::default(), &incoming)
    }

    pub(crate) fn from_unique(entries: Vec<ThemeVariable>) -> Self {
        Self { entries }
    }

    /// Value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn as_slice(&self) -> &[ThemeVariable] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThemeVariable> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSnapshot {
    /// Build a snapshot from arbitrary entries; later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = ConfigSetting>) -> Self {
        let incoming: Vec<ConfigSetting> = entries.into_iter().collect();
        merge_config(&Self::default(), &incoming)
    }

    pub(crate) fn from_unique(entries: Vec<ConfigSetting>) -> Self {
        Self { entries }
    }

    /// Value for `name`, if set.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    pub fn as_slice(&self) -> &[ConfigSetting] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigSetting> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ThemeVariable>> for ThemeSnapshot {
    fn from(entries: Vec<ThemeVariable>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<ThemeSnapshot> for Vec<ThemeVariable> {
    fn from(snapshot: ThemeSnapshot) -> Self {
        snapshot.entries
    }
}

impl From<Vec<ConfigSetting>> for ConfigSnapshot {
    fn from(entries: Vec<ConfigSetting>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<ConfigSnapshot> for Vec<ConfigSetting> {
    fn from(snapshot: ConfigSnapshot) -> Self {
        snapshot.entries
    }
}

impl<'a> IntoIterator for &'a ThemeSnapshot {
    type Item = &'a ThemeVariable;
    type IntoIter = std::slice::Iter<'a, ThemeVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ConfigSnapshot {
    type Item = &'a ConfigSetting;
    type IntoIter = std::slice::Iter<'a, ConfigSetting>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Session-scoped state
// ---------------------------------------------------------------------------

/// The theme/config pair owned by one chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub theme: ThemeSnapshot,
    #[serde(rename = "configs")]
    pub config: ConfigSnapshot,
}

impl ThemeState {
    /// Fresh state: empty theme, config seeded from the widget baseline.
    pub fn with_baseline(baseline: &ConfigSnapshot) -> Self {
        Self {
            theme: ThemeSnapshot::new(),
            config: baseline.clone(),
        }
    }
}
