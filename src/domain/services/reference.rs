use crate::domain::model::IsotopeReferenceEntry;
use std::collections::HashMap;

/// Minimum half-life, in hours, for an isotope to survive the delivery network.
pub const SERVICE_THRESHOLD_HOURS: f64 = 6.0;

const DEFAULT_HALF_LIVES: &[(&str, f64)] = &[
    ("Mo-99", 65.9),
    ("Lu-177", 159.6),
    ("I-131", 192.0),
    ("Ac-225", 237.6),
    ("Tc-99m", 6.0),
    ("Tb-161", 166.8),
    ("Ga-68", 1.13),
    ("Y-90", 64.1),
    ("F-18", 1.83),
    ("Ho-166", 26.8),
    ("Re-188", 17.0),
    ("I-125", 1425.6),
    ("Sm-153", 46.3),
    ("Ra-223", 273.6),
];

/// Curated isotope half-lives, keyed by symbol. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    half_lives: HashMap<String, f64>,
}

impl ReferenceTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            half_lives: entries
                .into_iter()
                .map(|(symbol, hours)| (symbol.into(), hours))
                .collect(),
        }
    }

    pub fn lookup(&self, symbol: &str) -> Option<f64> {
        self.half_lives.get(symbol).copied()
    }

    /// A copy of this table with `overrides` added or replacing existing entries.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let mut half_lives = self.half_lives.clone();
        for (symbol, hours) in overrides {
            half_lives.insert(symbol.clone(), *hours);
        }
        Self { half_lives }
    }

    pub fn len(&self) -> usize {
        self.half_lives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.half_lives.is_empty()
    }

    /// All entries, shortest half-life first. Ties are ordered by symbol.
    pub fn entries_by_half_life(&self) -> Vec<IsotopeReferenceEntry> {
        let mut entries: Vec<IsotopeReferenceEntry> = self
            .half_lives
            .iter()
            .map(|(symbol, hours)| IsotopeReferenceEntry {
                symbol: symbol.clone(),
                half_life_hours: *hours,
            })
            .collect();
        entries.sort_by(|a, b| {
            a.half_life_hours
                .total_cmp(&b.half_life_hours)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        entries
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_LIVES.iter().copied())
    }
}

/// Human-readable half-life: minutes below one hour, hours below one day, days otherwise.
pub fn format_half_life(hours: f64) -> String {
    if hours < 1.0 {
        format!("{:.1} min", hours * 60.0)
    } else if hours < 24.0 {
        format!("{:.1} h", hours)
    } else {
        format!("{:.1} d", hours / 24.0)
    }
}
