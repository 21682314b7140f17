pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::ViewConfig;

pub use crate::core::{
    engine::{ColumnEngine, EngineConfig},
    pipeline::ReportPipeline,
    presets::PresetMatch,
    runner::ReportRunner,
};
pub use crate::domain::model::{Column, FieldObservation, Preset, PresetColumns, QuickFilterTag};
pub use crate::utils::error::{ColumnError, Result};
