pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::engine::EngineConfig;
#[cfg(feature = "cli")]
use crate::core::presets::PresetMatch;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use self::toml_config::{ViewConfig, MAX_DEPTH_LIMIT};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "column-lens")]
#[command(about = "Infer table columns, presets and quick filters from JSON records")]
pub struct CliConfig {
    /// JSON array, single JSON object or JSON Lines file
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// TOML file with [view] settings and extra [[presets]]
    #[arg(long)]
    pub config: Option<String>,

    /// Preset to apply (overrides view.initial_preset)
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long, help = "Columns shown when no preset is selected")]
    pub max_columns: Option<usize>,

    #[arg(long, help = "How deep nested objects are expanded into columns")]
    pub max_depth: Option<usize>,

    /// Column keys to flip after the preset is applied
    #[arg(long = "toggle", value_delimiter = ',')]
    pub toggles: Vec<String>,

    #[arg(long, help = "Match preset entries as plain substrings of column keys")]
    pub substring_match: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(skip)]
    pub view: ViewConfig,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the `--config` file, if one was given.
    pub fn load_view_config(mut self) -> Result<Self> {
        if let Some(path) = &self.config {
            tracing::debug!("Loading view config from {}", path);
            self.view = ViewConfig::from_file(path)?;
        }
        Ok(self)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn engine_config(&self) -> EngineConfig {
        let mut config = self.view.engine_config();
        if let Some(preset) = &self.preset {
            config.initial_preset = Some(preset.clone());
        }
        if let Some(max) = self.max_columns {
            config.max_default_columns = max;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if self.substring_match {
            config.preset_match = PresetMatch::Substring;
        }
        config
    }

    fn toggles(&self) -> &[String] {
        if self.toggles.is_empty() {
            self.view.toggles()
        } else {
            &self.toggles
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        if let Some(preset) = &self.preset {
            validate_non_empty_string("preset", preset)?;
        }
        if let Some(max) = self.max_columns {
            validate_positive_number("max_columns", max, 1)?;
        }
        if let Some(depth) = self.max_depth {
            validate_range("max_depth", depth, 1, MAX_DEPTH_LIMIT)?;
        }
        self.view.validate()
    }
}
