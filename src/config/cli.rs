use crate::config::toml_config::DashboardConfig;
use crate::domain::model::InputSource;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "nm-serviceability")]
#[command(about = "Classifies nuclear-medicine sites by whether their isotopes can be shipped in time")]
pub struct CliConfig {
    /// TOML configuration file; flags given on the command line override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Excel workbook with Manufacturers, Legend and UPS_Gateways sheets
    #[arg(long, conflicts_with_all = ["sites", "legend", "gateways"])]
    pub workbook: Option<String>,

    /// Site list CSV (ID, Country, Latitude, Longitude)
    #[arg(long)]
    pub sites: Option<String>,

    /// Legend CSV (ID, Description)
    #[arg(long)]
    pub legend: Option<String>,

    /// Gateway CSV (Code, City, Country, Status, Latitude, Longitude)
    #[arg(long)]
    pub gateways: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Minimum half-life in hours for an isotope to count as serviceable
    #[arg(long)]
    pub threshold_hours: Option<f64>,

    /// Pack the outputs into dashboard_output.zip
    #[arg(long)]
    pub compress: bool,

    /// Print the summary table instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    fn input_from_flags(&self) -> Option<InputSource> {
        if let Some(path) = &self.workbook {
            return Some(InputSource::Workbook { path: path.clone() });
        }
        self.sites.as_ref().map(|sites| InputSource::Csv {
            sites: sites.clone(),
            legend: self.legend.clone(),
            gateways: self.gateways.clone(),
        })
    }

    /// Merges the optional TOML file with the command-line overrides.
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let mut config = DashboardConfig::from_file(path)?;
                if let Some(input) = self.input_from_flags() {
                    config.input = input;
                }
                config
            }
            None => {
                let input = self.input_from_flags();
                let input = validate_required_field("--sites or --workbook", &input)?;
                DashboardConfig::new(input.clone())
            }
        };

        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(threshold) = self.threshold_hours {
            config.serviceability.threshold_hours = threshold;
        }
        if self.compress {
            config.output.compress = true;
        }

        Ok(config)
    }
}
