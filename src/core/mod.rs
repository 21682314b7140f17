pub mod analyzer;
pub mod engine;
pub mod formatter;
pub mod pipeline;
pub mod presets;
pub mod runner;
pub mod synthesizer;
pub mod tags;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
