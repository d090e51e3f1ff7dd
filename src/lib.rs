pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::DashboardConfig;
pub use core::{etl::EtlEngine, pipeline::DashboardPipeline};
pub use domain::model::{ExtractedIsotope, Serviceability, SiteRecord};
pub use domain::services::classifier::classify;
pub use domain::services::extractor::IsotopeExtractor;
pub use domain::services::reference::ReferenceTable;
pub use domain::services::summary::SummaryBuilder;
pub use domain::services::ServiceabilityConfig;
pub use utils::error::{DashboardError, Result};
