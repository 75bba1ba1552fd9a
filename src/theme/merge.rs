//! Non-destructive snapshot merge.
//!
//! Model output is never trusted to be complete: every entry of the previous
//! snapshot that the incoming batch does not mention survives unchanged.
//! Incoming entries overwrite in place or append, last occurrence wins.

use indexmap::IndexMap;

use super::{ConfigSetting, ConfigSnapshot, Keyed, ThemeSnapshot, ThemeVariable};

/// Union `incoming` into `previous`, overriding shared keys.
pub fn merge_theme(previous: &ThemeSnapshot, incoming: &[ThemeVariable]) -> ThemeSnapshot {
    ThemeSnapshot::from_unique(union_by_key(previous.as_slice(), incoming))
}

/// Union `incoming` into `previous`, overriding shared names.
pub fn merge_config(previous: &ConfigSnapshot, incoming: &[ConfigSetting]) -> ConfigSnapshot {
    ConfigSnapshot::from_unique(union_by_key(previous.as_slice(), incoming))
}

/// Theme after an explicit reset.
pub fn reset_theme() -> ThemeSnapshot {
    ThemeSnapshot::new()
}

/// Config after an explicit reset: a copy of the baseline, never the live
/// mutated snapshot.
pub fn reset_config(baseline: &ConfigSnapshot) -> ConfigSnapshot {
    baseline.clone()
}

fn union_by_key<T: Keyed + Clone>(previous: &[T], incoming: &[T]) -> Vec<T> {
    let mut merged: IndexMap<String, T> = IndexMap::with_capacity(previous.len() + incoming.len());
    for entry in previous.iter().chain(incoming) {
        // IndexMap::insert keeps the original slot for an existing key.
        merged.insert(entry.entry_key().to_string(), entry.clone());
    }
    merged.into_values().collect()
}
