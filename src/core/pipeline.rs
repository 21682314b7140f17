use crate::core::engine::ColumnEngine;
use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::utils::error::{ColumnError, Result};
use serde_json::{json, Value};
use std::path::Path;

pub const TABLE_FILENAME: &str = "columns.csv";
pub const REPORT_FILENAME: &str = "columns.json";

/// Reads records from a local file, runs them through a [`ColumnEngine`]
/// and writes the visible table plus a column report.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

/// Accepts a JSON array, a single JSON document, or JSON Lines.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let text = std::str::from_utf8(bytes).map_err(|e| ColumnError::InvalidInputError {
        message: format!("input is not UTF-8: {}", e),
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(single) => Ok(vec![single]),
        Err(whole_err) => {
            tracing::debug!("Input is not a single JSON document ({}), trying JSON Lines", whole_err);
            let mut records = Vec::new();
            for (index, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record = serde_json::from_str(line).map_err(|e| ColumnError::InvalidInputError {
                    message: format!("line {}: {}", index + 1, e),
                })?;
                records.push(record);
            }
            Ok(records)
        }
    }
}

pub fn render_table(engine: &ColumnEngine, records: &[Record]) -> Result<String> {
    let visible = engine.visible_columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(visible.iter().map(|c| c.label.as_str()))?;
    for record in records.iter().filter(|r| r.is_object()) {
        writer.write_record(visible.iter().map(|c| c.render(record)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ColumnError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ColumnError::InvalidInputError {
        message: format!("table is not UTF-8: {}", e),
    })
}

pub fn render_report(engine: &ColumnEngine, record_count: usize) -> Result<String> {
    let visible: Vec<&str> = engine
        .visible_columns()
        .iter()
        .map(|c| c.key.as_str())
        .collect();

    let report = json!({
        "record_count": record_count,
        "selected_preset": engine.selected_preset(),
        "platforms": engine.platforms(),
        "visible_columns": visible,
        "columns": engine.columns(),
        "presets": engine.presets(),
        "tags": engine.tags(),
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let input = self.config.input_path();
        tracing::debug!("Reading records from: {}", input);
        let bytes = self.storage.read_file(input).await?;
        let records = parse_records(&bytes)?;

        let skipped = records.iter().filter(|r| !r.is_object()).count();
        if skipped > 0 {
            tracing::warn!("{} of {} records are not JSON objects and will be skipped", skipped, records.len());
        }
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let mut engine = ColumnEngine::new(self.config.engine_config());
        engine.load(&data);

        for key in self.config.toggles() {
            match engine.toggle_column(key) {
                Some(visible) => tracing::debug!("Toggled '{}' -> visible: {}", key, visible),
                None => tracing::warn!("Cannot toggle unknown column '{}'", key),
            }
        }

        let csv_output = render_table(&engine, &data)?;
        let report_json = render_report(&engine, data.len())?;

        Ok(TransformResult {
            record_count: data.len(),
            selected_preset: engine.selected_preset().map(str::to_string),
            columns: engine.columns().to_vec(),
            tags: engine.tags(),
            csv_output,
            report_json,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let table_path = self.output_file(TABLE_FILENAME);
        let report_path = self.output_file(REPORT_FILENAME);

        tracing::debug!("Writing table ({} bytes) to {}", result.csv_output.len(), table_path);
        self.storage
            .write_file(&table_path, result.csv_output.as_bytes())
            .await?;

        tracing::debug!("Writing column report to {}", report_path);
        self.storage
            .write_file(&report_path, result.report_json.as_bytes())
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
