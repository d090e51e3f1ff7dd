use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting dashboard build...");

        // Extract
        let source = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} sites and {} gateways",
            source.sites.len(),
            source.gateways.len()
        );

        // Transform
        let report = self.pipeline.transform(source).await?;
        tracing::info!(
            "Classified {} sites ({} serviceable, {} distinct isotopes)",
            report.stats.total_sites,
            report.stats.serviceable_sites,
            report.stats.isotopes
        );

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!(
            "Output saved to: {} ({} ms)",
            output_path,
            started.elapsed().as_millis()
        );

        Ok(output_path)
    }
}
