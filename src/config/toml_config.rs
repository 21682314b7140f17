use crate::core::engine::EngineConfig;
use crate::core::presets::{builtin_presets, PresetMatch, ALL_PRESET_ID};
use crate::domain::model::{Preset, PresetColumns};
use crate::utils::error::{ColumnError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const MAX_DEPTH_LIMIT: usize = 8;
/// A preset whose column list is just this entry shows every column.
pub const WILDCARD_COLUMN: &str = "*";

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewSettings {
    pub max_default_columns: Option<usize>,
    pub initial_preset: Option<String>,
    pub default_preset: Option<String>,
    pub max_depth: Option<usize>,
    pub preset_match: Option<PresetMatch>,
    pub toggles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub columns: Vec<String>,
}

impl PresetConfig {
    pub fn to_preset(&self) -> Preset {
        let columns = if self.columns.iter().any(|c| c == WILDCARD_COLUMN) {
            PresetColumns::All
        } else {
            PresetColumns::Keys(self.columns.clone())
        };
        Preset {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            platform: self.platform.clone(),
            columns,
        }
    }
}

impl ViewConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ColumnError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ColumnError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            max_default_columns: self
                .view
                .max_default_columns
                .unwrap_or(defaults.max_default_columns),
            initial_preset: self.view.initial_preset.clone(),
            default_preset: self
                .view
                .default_preset
                .clone()
                .unwrap_or(defaults.default_preset),
            max_depth: self.view.max_depth.unwrap_or(defaults.max_depth),
            preset_match: self.view.preset_match.unwrap_or(defaults.preset_match),
            extra_presets: self.presets.iter().map(PresetConfig::to_preset).collect(),
        }
    }

    pub fn toggles(&self) -> &[String] {
        self.view.toggles.as_deref().unwrap_or(&[])
    }

    fn is_known_preset(&self, id: &str) -> bool {
        id == ALL_PRESET_ID
            || builtin_presets().iter().any(|p| p.id == id)
            || self.presets.iter().any(|p| p.id == id)
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(max) = self.view.max_default_columns {
            validate_positive_number("view.max_default_columns", max, 1)?;
        }
        if let Some(depth) = self.view.max_depth {
            validate_range("view.max_depth", depth, 1, MAX_DEPTH_LIMIT)?;
        }

        for preset in &self.presets {
            validate_non_empty_string("presets.id", &preset.id)?;
            if preset.id == ALL_PRESET_ID {
                return Err(ColumnError::InvalidConfigValueError {
                    field: "presets.id".to_string(),
                    value: preset.id.clone(),
                    reason: "'all' is reserved for the generated preset".to_string(),
                });
            }
            if preset.columns.is_empty() {
                return Err(ColumnError::InvalidConfigValueError {
                    field: format!("presets.{}.columns", preset.id),
                    value: "[]".to_string(),
                    reason: "A preset needs at least one column".to_string(),
                });
            }
        }

        for (field, id) in [
            ("view.initial_preset", &self.view.initial_preset),
            ("view.default_preset", &self.view.default_preset),
        ] {
            if let Some(id) = id {
                if !self.is_known_preset(id) {
                    return Err(ColumnError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: id.clone(),
                        reason: "No preset with this id".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for ViewConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
