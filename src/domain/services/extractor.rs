//! Isotope extraction from free-form site descriptions.
//!
//! Each isotope-like token is resolved by trying the configured
//! [`HalfLifeStrategy`] list in order; the first strategy that yields a
//! half-life wins and the rest are skipped. Tokens no strategy can resolve
//! are dropped from the result.

use crate::domain::model::ExtractedIsotope;
use crate::domain::services::reference::{format_half_life, ReferenceTable};
use crate::domain::services::ServiceabilityConfig;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::LazyLock;

static ISOTOPE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]?-[0-9]+m?").expect("isotope token pattern is valid"));

/// A resolved half-life and the text shown next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfLife {
    pub hours: f64,
    pub display: String,
}

pub trait HalfLifeStrategy: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// `text` is the full description the symbol was found in.
    fn resolve(&self, symbol: &str, text: &str) -> Option<HalfLife>;
}

/// Looks the symbol up in the curated table. Values written in the text are ignored.
#[derive(Debug, Clone)]
pub struct ReferenceLookup {
    table: ReferenceTable,
}

impl ReferenceLookup {
    pub fn new(table: ReferenceTable) -> Self {
        Self { table }
    }
}

impl HalfLifeStrategy for ReferenceLookup {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn resolve(&self, symbol: &str, _text: &str) -> Option<HalfLife> {
        self.table.lookup(symbol).map(|hours| HalfLife {
            hours,
            display: format_half_life(hours),
        })
    }
}

/// Reads a value written directly after the symbol, e.g. `Cu-64 12.7h`,
/// `Ra-224 ~3.6d` or `Cu-61 3.3–3.4 h` (the low bound of a range is used).
#[derive(Debug, Clone, Default)]
pub struct AdjacentSpan;

impl AdjacentSpan {
    fn to_hours(value: f64, unit: &str) -> f64 {
        match unit {
            "min" => value / 60.0,
            "d" => value * 24.0,
            _ => value,
        }
    }
}

impl HalfLifeStrategy for AdjacentSpan {
    fn name(&self) -> &'static str {
        "adjacent-span"
    }

    fn resolve(&self, symbol: &str, text: &str) -> Option<HalfLife> {
        let pattern = format!(
            r"{}\s*~?([0-9.]+(?:–[0-9.]+)?)\s*(min|h|d)",
            regex::escape(symbol)
        );
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(text)?;

        let span = caps.get(1)?.as_str();
        let unit = caps.get(2)?.as_str();
        let low = span.split('–').next().unwrap_or(span);

        match low.parse::<f64>() {
            Ok(value) => Some(HalfLife {
                hours: Self::to_hours(value, unit),
                display: format!("{} {}", low, unit),
            }),
            Err(e) => {
                tracing::debug!("Ignoring malformed half-life '{}' for {}: {}", span, symbol, e);
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct IsotopeExtractor {
    strategies: Vec<Box<dyn HalfLifeStrategy>>,
    config: ServiceabilityConfig,
}

impl IsotopeExtractor {
    /// Reference table first, then the adjacent-span parser.
    pub fn new(config: &ServiceabilityConfig) -> Self {
        let strategies: Vec<Box<dyn HalfLifeStrategy>> = vec![
            Box::new(ReferenceLookup::new(config.reference.clone())),
            Box::new(AdjacentSpan),
        ];
        Self::with_strategies(strategies, config)
    }

    /// `config` supplies the threshold; the strategies decide where half-lives come from.
    pub fn with_strategies(strategies: Vec<Box<dyn HalfLifeStrategy>>, config: &ServiceabilityConfig) -> Self {
        Self {
            strategies,
            config: config.clone(),
        }
    }

    pub fn resolve(&self, symbol: &str, text: &str) -> Option<HalfLife> {
        self.strategies.iter().find_map(|strategy| {
            let found = strategy.resolve(symbol, text);
            if found.is_some() {
                tracing::trace!("{} resolved by {}", symbol, strategy.name());
            }
            found
        })
    }

    /// Serviceable isotopes first, then the rest; alphabetical within each group.
    pub fn extract(&self, description: &str) -> Vec<ExtractedIsotope> {
        let mut isotopes: Vec<ExtractedIsotope> = find_symbols(description)
            .into_iter()
            .filter_map(|symbol| {
                let Some(half_life) = self.resolve(&symbol, description) else {
                    tracing::debug!("No half-life found for {}, dropping it", symbol);
                    return None;
                };
                Some(ExtractedIsotope {
                    can_serve: self.config.can_serve(half_life.hours),
                    half_life_hours: (half_life.hours * 100.0).round() / 100.0,
                    half_life_display: half_life.display,
                    symbol,
                })
            })
            .collect();

        isotopes.sort_by(|a, b| {
            b.can_serve
                .cmp(&a.can_serve)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        isotopes
    }
}

/// Isotope-like tokens in first-seen order, without repeats.
pub fn find_symbols(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ISOTOPE_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|symbol| seen.insert(*symbol))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> IsotopeExtractor {
        IsotopeExtractor::new(&ServiceabilityConfig::default())
    }

    fn hours_of(symbol: &str, text: &str) -> Option<f64> {
        AdjacentSpan.resolve(symbol, text).map(|h| h.hours)
    }

    #[test]
    fn test_find_symbols_dedups_in_order() {
        let symbols = find_symbols("Tc-99m from Mo-99; Mo-99 generators, I-131 and Tc-99m kits");
        assert_eq!(symbols, vec!["Tc-99m", "Mo-99", "I-131"]);
    }

    #[test]
    fn test_find_symbols_none() {
        assert!(find_symbols("Radiopharmacy, no isotopes listed").is_empty());
        assert!(find_symbols("").is_empty());
    }

    #[test]
    fn test_adjacent_span_units() {
        assert_eq!(hours_of("Cu-62", "Cu-62 90 min"), Some(1.5));
        assert_eq!(hours_of("Xe-133", "Xe-133 8 d"), Some(192.0));
        assert_eq!(hours_of("Cu-67", "Cu-67 4.5 h"), Some(4.5));
        assert_eq!(hours_of("Cu-67", "Cu-67 4.5h"), Some(4.5));
    }

    #[test]
    fn test_adjacent_span_tilde_and_range() {
        let found = AdjacentSpan.resolve("Ra-224", "Ra-224 ~3.6d").unwrap();
        assert_eq!(found.display, "3.6 d");
        assert!((found.hours - 86.4).abs() < 1e-9);

        let found = AdjacentSpan.resolve("Pb-212", "Pb-212 10.6–10.7 h").unwrap();
        assert_eq!(found.display, "10.6 h");
        assert_eq!(found.hours, 10.6);
    }

    #[test]
    fn test_adjacent_span_requires_adjacency() {
        assert_eq!(hours_of("Cu-64", "Cu-64 with a half-life of 12.7 h"), None);
        assert_eq!(hours_of("Cu-64", "Cu-64 (12.7 h)"), None);
        assert_eq!(hours_of("Cu-64", "Cu-64"), None);
    }

    #[test]
    fn test_malformed_span_is_dropped() {
        assert_eq!(hours_of("Cu-64", "Cu-64 1.2.3h"), None);
        let isotopes = extractor().extract("Cyclotron: Cu-64 1.2.3h, Mo-99");
        assert_eq!(isotopes.len(), 1);
        assert_eq!(isotopes[0].symbol, "Mo-99");
    }

    #[test]
    fn test_reference_beats_text() {
        let isotopes = extractor().extract("Reactor: Mo-99 12h and I-131 2d");
        let mo = isotopes.iter().find(|i| i.symbol == "Mo-99").unwrap();
        let iodine = isotopes.iter().find(|i| i.symbol == "I-131").unwrap();
        assert_eq!(mo.half_life_hours, 65.9);
        assert_eq!(mo.half_life_display, "2.7 d");
        assert_eq!(iodine.half_life_hours, 192.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let isotopes = extractor().extract("Tc-99m kits; Zr-1 6h");
        assert_eq!(isotopes.len(), 2);
        assert!(isotopes.iter().all(|i| i.can_serve));
    }

    #[test]
    fn test_sort_serviceable_first_then_alphabetical() {
        let isotopes = extractor().extract("F-18, Y-90, Ga-68, Lu-177, I-131");
        let order: Vec<&str> = isotopes.iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(order, vec!["I-131", "Lu-177", "Y-90", "F-18", "Ga-68"]);
    }

    #[test]
    fn test_substitute_table_and_threshold() {
        let config = ServiceabilityConfig::new(ReferenceTable::new([("Ga-68", 1.13)]), 1.0);
        let isotopes = IsotopeExtractor::new(&config).extract("Ga-68 generator, Mo-99 65.9h");
        assert_eq!(isotopes.len(), 2);
        assert!(isotopes.iter().all(|i| i.can_serve));
        // Mo-99 is not in the substitute table, so the text value is used
        let mo = isotopes.iter().find(|i| i.symbol == "Mo-99").unwrap();
        assert_eq!(mo.half_life_display, "65.9 h");
    }

    #[test]
    fn test_reference_only_pipeline() {
        let config = ServiceabilityConfig::default();
        let extractor = IsotopeExtractor::with_strategies(
            vec![Box::new(ReferenceLookup::new(config.reference.clone()))],
            &config,
        );
        assert!(extractor.extract("Cu-64 12.7h").is_empty());
    }

    #[test]
    fn test_verdict_agrees_with_config_rule() {
        let config = ServiceabilityConfig::new(ReferenceTable::default(), 46.3);
        let extractor = IsotopeExtractor::new(&config);
        for entry in config.reference.entries_by_half_life() {
            let isotopes = extractor.extract(&entry.symbol);
            assert_eq!(isotopes.len(), 1, "{} not extracted", entry.symbol);
            assert_eq!(
                isotopes[0].can_serve,
                config.can_serve(entry.half_life_hours),
                "{}",
                entry.symbol
            );
        }
    }
}
