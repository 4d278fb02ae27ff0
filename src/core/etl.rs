use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use tokio::sync::Mutex;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: Mutex<SystemMonitor>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: Mutex::new(SystemMonitor::new(monitor_enabled)),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting coordinate extraction");
        let mut monitor = self.monitor.lock().await;

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", raw_data.len());
        monitor.log_stats("Extract");

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed {} records ({} with coordinates, {} without)",
            transformed.processed_records.len(),
            transformed.located,
            transformed.unlocated
        );
        monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);
        monitor.log_stats("Load");
        monitor.log_final_stats();

        Ok(output_path)
    }

    /// Extract and transform only. Nothing is handed to `load`, so no output is written.
    pub async fn dry_run(&self) -> Result<TransformResult> {
        tracing::info!("🔍 DRY RUN MODE - no output will be written");

        let raw_data = self.pipeline.extract().await?;
        let total = raw_data.len();
        let transformed = self.pipeline.transform(raw_data).await?;

        tracing::info!(
            "🔍 {} records: {} with coordinates, {} without",
            total,
            transformed.located,
            transformed.unlocated
        );
        Ok(transformed)
    }
}
