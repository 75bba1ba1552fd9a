//! Read-only catalogs of styleable variables and configuration knobs.
//!
//! The catalogs ground the model's vocabulary: the prompt lists every entry
//! so the model only emits keys the widget actually supports. Built-in
//! catalogs are embedded at compile time; deployments can point the config at
//! replacement JSON files.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_VARIABLES: &str = include_str!("templates/variables.json");
const BUILTIN_CONFIGS: &str = include_str!("templates/configs.json");

/// Catalog entry for a themeable CSS variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    pub description: String,
}

/// Catalog entry for a behavioral configuration knob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDescriptor {
    pub name: String,
    pub description: String,
}

/// Both catalogs, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    variables: Vec<VariableDescriptor>,
    configs: Vec<ConfigDescriptor>,
}

impl Catalog {
    /// Catalogs compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_VARIABLES, BUILTIN_CONFIGS)
    }

    /// Load catalogs, replacing either built-in list with a JSON file when a
    /// path is given.
    pub fn load(
        variables_path: Option<&Path>,
        configs_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let variables = match variables_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => BUILTIN_VARIABLES.to_string(),
        };
        let configs = match configs_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => BUILTIN_CONFIGS.to_string(),
        };
        Self::from_json(&variables, &configs)
    }

    /// Parse and validate catalog JSON arrays.
    pub fn from_json(variables: &str, configs: &str) -> Result<Self, ConfigError> {
        let variables: Vec<VariableDescriptor> = serde_json::from_str(variables)?;
        let configs: Vec<ConfigDescriptor> = serde_json::from_str(configs)?;
        ensure_unique_names("variable", variables.iter().map(|v| v.name.as_str()))?;
        ensure_unique_names("config", configs.iter().map(|c| c.name.as_str()))?;
        Ok(Self { variables, configs })
    }

    pub fn variables(&self) -> &[VariableDescriptor] {
        &self.variables
    }

    pub fn configs(&self) -> &[ConfigDescriptor] {
        &self.configs
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }

    pub fn has_config(&self, name: &str) -> bool {
        self.configs.iter().any(|c| c.name == name)
    }
}

fn ensure_unique_names<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{kind} catalog contains an entry with an empty name"
            )));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Invalid(format!(
                "{kind} catalog lists `{name}` more than once"
            )));
        }
    }
    Ok(())
}
