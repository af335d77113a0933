/// Generator definitions — variables, template pools, and validation.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Reserved pool key that every expansion starts from.
pub const START_SYMBOL: &str = "main";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no 'main' pool defined")]
    MissingStartSymbol,
    #[error("pool '{0}' has no templates")]
    EmptyPool(String),
    #[error("variable '{0}' is declared more than once")]
    DuplicateVariable(String),
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A user-editable value referenced from templates as `{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: String,
    /// Value typed in by the user. Never serialized.
    #[serde(skip)]
    pub override_value: Option<String>,
}

impl Variable {
    pub fn new(id: &str, description: &str, default: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            default: default.to_string(),
            override_value: None,
        }
    }

    /// The override when present and non-empty, otherwise the default.
    pub fn effective_value(&self) -> &str {
        match self.override_value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => &self.default,
        }
    }

    /// The `{id}` token this variable replaces.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.id)
    }
}

/// A complete generator definition.
///
/// `name` and `id` are assigned by whoever ingests the definition and are not
/// part of the serialized form; `templates` keeps declaration order, which is
/// the order the expander scans pool keys in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub templates: IndexMap<String, Vec<String>>,
}

impl GeneratorConfig {
    /// Parse a definition from TOML, the format users write in issues.
    pub fn from_toml_str(input: &str) -> Result<GeneratorConfig, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Parse a definition from JSON, the format embedded in published pages.
    pub fn from_json_str(input: &str) -> Result<GeneratorConfig, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse a definition from a RON string.
    pub fn from_ron_str(input: &str) -> Result<GeneratorConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Load a definition from disk, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            Some("ron") => Self::from_ron_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Serialize the page-embedded form: variables and templates only.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check everything the expansion core assumes but does not verify.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.templates.contains_key(START_SYMBOL) {
            return Err(ConfigError::MissingStartSymbol);
        }

        if let Some((key, _)) = self.templates.iter().find(|(_, pool)| pool.is_empty()) {
            return Err(ConfigError::EmptyPool(key.clone()));
        }

        let mut seen = FxHashSet::default();
        for var in &self.variables {
            if !seen.insert(var.id.as_str()) {
                return Err(ConfigError::DuplicateVariable(var.id.clone()));
            }
        }

        Ok(())
    }

    /// Variables whose id is also a pool key. Pools are resolved first, so
    /// their `{id}` tokens are always expanded as pools.
    pub fn shadowed_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(move |v| self.templates.contains_key(&v.id))
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    pub fn variable_mut(&mut self, id: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.id == id)
    }
}
