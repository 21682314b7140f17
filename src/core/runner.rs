use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting column report...");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());

        // Transform
        let result = self.pipeline.transform(records).await?;
        let visible = result.columns.iter().filter(|c| c.visible).count();
        tracing::info!(
            "🧮 Derived {} columns ({} visible) and {} quick filter tags",
            result.columns.len(),
            visible,
            result.tags.len()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("📁 Output saved to: {} in {:?}", output_path, started.elapsed());

        Ok(output_path)
    }
}
