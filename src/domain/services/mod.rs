pub mod classifier;
pub mod extractor;
pub mod reference;
pub mod summary;

use reference::{ReferenceTable, SERVICE_THRESHOLD_HOURS};

/// Reference data and threshold every isotope service is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceabilityConfig {
    pub reference: ReferenceTable,
    pub threshold_hours: f64,
}

impl ServiceabilityConfig {
    pub fn new(reference: ReferenceTable, threshold_hours: f64) -> Self {
        Self {
            reference,
            threshold_hours,
        }
    }

    pub fn can_serve(&self, half_life_hours: f64) -> bool {
        half_life_hours >= self.threshold_hours
    }
}

impl Default for ServiceabilityConfig {
    fn default() -> Self {
        Self::new(ReferenceTable::default(), SERVICE_THRESHOLD_HOURS)
    }
}
