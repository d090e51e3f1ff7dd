use crate::adapters::source::load_source;
use crate::core::{ConfigProvider, DashboardReport, Pipeline, SourceData, Storage};
use crate::domain::services::summary::SummaryBuilder;
use crate::utils::error::{DashboardError, Result};
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUMMARY_FILE: &str = "summary.csv";
pub const REFERENCE_FILE: &str = "reference.csv";
pub const COUNTRIES_FILE: &str = "countries.csv";
pub const REPORT_FILE: &str = "dashboard.json";
pub const ZIP_FILE: &str = "dashboard_output.zip";

/// Rendered output files, in the order they are written.
pub type OutputFiles = Vec<(&'static str, Vec<u8>)>;

pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

fn csv_bytes<I, R>(header: &[&str], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| DashboardError::IoError(e.into_error()))
}

/// Renders the report into the flat tables and the JSON document.
pub fn render_outputs(report: &DashboardReport) -> Result<OutputFiles> {
    let can_header = format!("Can Serve (≥{}h)", report.threshold_hours);
    let cannot_header = format!("Cannot Serve (<{}h)", report.threshold_hours);

    let summary = csv_bytes(
        &["Site", "Name", can_header.as_str(), cannot_header.as_str(), "Status"],
        report.summary.iter().map(|row| {
            [
                row.site_id.to_string(),
                row.name.clone(),
                row.can_serve.clone(),
                row.cannot_serve.clone(),
                row.status.clone(),
            ]
        }),
    )?;

    let reference = csv_bytes(
        &["Isotope", "Half-Life", "Serviceable"],
        report
            .reference
            .iter()
            .map(|row| [row.symbol.as_str(), row.display.as_str(), row.label.as_str()]),
    )?;

    let countries = csv_bytes(
        &["Country", "Site IDs"],
        report
            .countries
            .iter()
            .map(|row| [row.country.as_str(), row.site_ids.as_str()]),
    )?;

    let json = serde_json::to_vec_pretty(report)?;

    Ok(vec![
        (SUMMARY_FILE, summary),
        (REFERENCE_FILE, reference),
        (COUNTRIES_FILE, countries),
        (REPORT_FILE, json),
    ])
}

fn zip_outputs(files: &OutputFiles) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<SourceData> {
        let input = self.config.input_source();
        tracing::debug!("Loading records from {:?}", input);
        load_source(&self.storage, &input).await
    }

    async fn transform(&self, data: SourceData) -> Result<DashboardReport> {
        let builder = SummaryBuilder::new(self.config.serviceability());
        let report = builder.build(&data);

        for site in &report.sites {
            tracing::debug!(
                "Site {} -> {:?} ({} isotopes)",
                site.site.id,
                site.serviceability,
                site.isotopes.len()
            );
        }
        Ok(report)
    }

    async fn load(&self, report: DashboardReport) -> Result<String> {
        let files = render_outputs(&report)?;
        let base = self.config.output_path().trim_end_matches('/');

        if self.config.compress_output() {
            let zip_data = zip_outputs(&files)?;
            let output_path = format!("{}/{}", base, ZIP_FILE);
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&output_path, &zip_data).await?;
            return Ok(output_path);
        }

        for (name, data) in &files {
            self.storage
                .write_file(&format!("{}/{}", base, name), data)
                .await?;
        }
        Ok(base.to_string())
    }
}
