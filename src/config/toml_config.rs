use crate::domain::model::InputSource;
use crate::domain::ports::ConfigProvider;
use crate::domain::services::reference::{ReferenceTable, SERVICE_THRESHOLD_HOURS};
use crate::domain::services::ServiceabilityConfig;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Longest half-life, in hours, accepted for a threshold or a reference override (~100 years).
const MAX_HALF_LIFE_HOURS: f64 = 876_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub input: InputSource,
    #[serde(default)]
    pub serviceability: ServiceabilitySection,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceabilitySection {
    #[serde(default = "default_threshold")]
    pub threshold_hours: f64,
    /// Extra or corrected half-lives (hours), keyed by isotope symbol.
    #[serde(default)]
    pub reference: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub compress: bool,
}

fn default_threshold() -> f64 {
    SERVICE_THRESHOLD_HOURS
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for ServiceabilitySection {
    fn default() -> Self {
        Self {
            threshold_hours: default_threshold(),
            reference: HashMap::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            compress: false,
        }
    }
}

impl DashboardConfig {
    pub fn new(input: InputSource) -> Self {
        Self {
            input,
            serviceability: ServiceabilitySection::default(),
            output: OutputConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left verbatim.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        match &self.input {
            InputSource::Csv {
                sites,
                legend,
                gateways,
            } => {
                validate_path("input.sites", sites)?;
                validate_file_extension("input.sites", sites, &["csv"])?;
                if let Some(legend) = legend {
                    validate_file_extension("input.legend", legend, &["csv"])?;
                }
                if let Some(gateways) = gateways {
                    validate_file_extension("input.gateways", gateways, &["csv"])?;
                }
            }
            InputSource::Workbook { path } => {
                validate_path("input.path", path)?;
                validate_file_extension("input.path", path, &["xlsx"])?;
            }
        }

        validate_path("output.path", &self.output.path)?;
        validate_range(
            "serviceability.threshold_hours",
            self.serviceability.threshold_hours,
            0.0,
            MAX_HALF_LIFE_HOURS,
        )?;

        for (symbol, hours) in &self.serviceability.reference {
            validate_non_empty_string("serviceability.reference", symbol)?;
            validate_range(
                &format!("serviceability.reference.{}", symbol),
                *hours,
                f64::MIN_POSITIVE,
                MAX_HALF_LIFE_HOURS,
            )?;
        }

        Ok(())
    }
}

impl ConfigProvider for DashboardConfig {
    fn input_source(&self) -> InputSource {
        self.input.clone()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn compress_output(&self) -> bool {
        self.output.compress
    }

    fn serviceability(&self) -> ServiceabilityConfig {
        let reference = ReferenceTable::default().with_overrides(&self.serviceability.reference);
        ServiceabilityConfig::new(reference, self.serviceability.threshold_hours)
    }
}
