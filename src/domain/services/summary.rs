use crate::domain::model::{
    CountrySummary, DashboardReport, DashboardStats, ExtractedIsotope, Gateway, GatewayMarker,
    LegendEntry, MarkerStyle, ReferenceRow, Serviceability, SiteRecord, SiteReport, SourceData,
    SummaryRow,
};
use crate::domain::services::classifier::classify;
use crate::domain::services::extractor::IsotopeExtractor;
use crate::domain::services::reference::format_half_life;
use crate::domain::services::ServiceabilityConfig;
use std::collections::{BTreeMap, BTreeSet, HashSet};

const TABLE_NAME_CHARS: usize = 30;
const POPUP_NAME_CHARS: usize = 40;
const LEGEND_TEXT_CHARS: usize = 80;
const GATEWAY_RADIUS_M: f64 = 120_000.0;
const GATEWAY_COLOR: &str = "#DC2626";
const EMPTY_LIST: &str = "—";

impl Serviceability {
    pub fn status_label(&self) -> &'static str {
        match self {
            Serviceability::CanServe => "✓ Full",
            Serviceability::CannotServe => "✗ None",
            Serviceability::Partial => "◐ Partial",
            Serviceability::Unknown => "? Unknown",
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Serviceability::CanServe => "✓ SERVICEABLE",
            Serviceability::CannotServe => "✗ NOT SERVICEABLE",
            Serviceability::Partial => "◐ PARTIAL",
            Serviceability::Unknown => "? NO ISOTOPE DATA",
        }
    }

    pub fn marker_style(&self) -> MarkerStyle {
        let (fill, border) = match self {
            Serviceability::CanServe => ("#22A06B", "#065F46"),
            Serviceability::CannotServe => ("#DC2626", "#7F1D1D"),
            Serviceability::Partial => ("#F59E0B", "#92400E"),
            Serviceability::Unknown => ("#9CA3AF", "#4B5563"),
        };
        MarkerStyle {
            fill: fill.to_string(),
            border: border.to_string(),
        }
    }
}

/// Keeps the first `max_chars` characters, marking the cut with `...`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept)
}

/// Facility name: the description up to the first `(`, then up to the first `;`.
pub fn site_name(description: &str) -> &str {
    let before_paren = description.split('(').next().unwrap_or(description);
    before_paren.split(';').next().unwrap_or(before_paren).trim()
}

/// Name shown in the summary table; an en-dash suffix is cut as well.
pub fn table_name(description: &str) -> String {
    let name = site_name(description);
    let name = name.split('–').next().unwrap_or(name).trim();
    truncate_chars(name, TABLE_NAME_CHARS)
}

/// Name shown in the popup header, capped at 40 characters including the ellipsis.
pub fn popup_name(description: &str) -> String {
    let name = site_name(description);
    if name.chars().count() > POPUP_NAME_CHARS {
        truncate_chars(name, POPUP_NAME_CHARS - 3)
    } else {
        name.to_string()
    }
}

fn join_or_dash<'a>(symbols: impl Iterator<Item = &'a str>) -> String {
    let joined = symbols.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        joined
    }
}

fn format_threshold(hours: f64) -> String {
    format!("{}h", hours)
}

pub fn summary_row(
    site: &SiteRecord,
    isotopes: &[ExtractedIsotope],
    verdict: Serviceability,
) -> SummaryRow {
    SummaryRow {
        site_id: site.id,
        name: table_name(&site.description),
        can_serve: join_or_dash(isotopes.iter().filter(|i| i.can_serve).map(|i| i.symbol.as_str())),
        cannot_serve: join_or_dash(
            isotopes
                .iter()
                .filter(|i| !i.can_serve)
                .map(|i| i.symbol.as_str()),
        ),
        status: verdict.status_label().to_string(),
    }
}

pub fn tooltip(site: &SiteRecord) -> String {
    format!("Site {}: {} (Click for details)", site.id, site.country)
}

pub fn popup_text(
    site: &SiteRecord,
    isotopes: &[ExtractedIsotope],
    verdict: Serviceability,
    threshold_hours: f64,
) -> String {
    let mut lines = vec![
        format!("Site {}", site.id),
        popup_name(&site.description),
        verdict.banner().to_string(),
        "Isotopes & Half-Lives".to_string(),
        format!("{:<8} {:>10}  {}", "Isotope", "T½", "Service"),
    ];
    for iso in isotopes {
        lines.push(format!(
            "{:<8} {:>10}  {}",
            iso.symbol,
            iso.half_life_display,
            if iso.can_serve { "✓" } else { "✗" }
        ));
    }
    lines.push(format!(
        "Threshold: ≥{} half-life required for service",
        format_threshold(threshold_hours)
    ));
    lines.join("\n")
}

pub fn legend_entry(site: &SiteRecord, isotopes: &[ExtractedIsotope], verdict: Serviceability) -> LegendEntry {
    LegendEntry {
        site_id: site.id,
        text: truncate_chars(&site.description, LEGEND_TEXT_CHARS),
        marker: verdict.marker_style(),
        badges: isotopes
            .iter()
            .map(|i| format!("{} ({})", i.symbol, i.half_life_display))
            .collect(),
    }
}

pub fn gateway_marker(gateway: &Gateway) -> GatewayMarker {
    GatewayMarker {
        gateway: gateway.clone(),
        radius_m: GATEWAY_RADIUS_M,
        color: GATEWAY_COLOR.to_string(),
        tooltip: format!("UPS Gateway: {} - {}", gateway.code, gateway.city),
    }
}

pub fn reference_rows(config: &ServiceabilityConfig) -> Vec<ReferenceRow> {
    config
        .reference
        .entries_by_half_life()
        .into_iter()
        .map(|entry| {
            let serviceable = config.can_serve(entry.half_life_hours);
            ReferenceRow {
                display: format_half_life(entry.half_life_hours),
                label: if serviceable { "✓ Yes" } else { "✗ No" }.to_string(),
                symbol: entry.symbol,
                half_life_hours: entry.half_life_hours,
                serviceable,
            }
        })
        .collect()
}

pub fn country_summary(sites: &[SiteRecord]) -> Vec<CountrySummary> {
    let mut by_country: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    for site in sites {
        by_country.entry(site.country.as_str()).or_default().insert(site.id);
    }
    by_country
        .into_iter()
        .map(|(country, ids)| CountrySummary {
            country: country.to_string(),
            site_ids: ids.iter().map(u32::to_string).collect::<Vec<_>>().join(", "),
        })
        .collect()
}

/// Composes extraction and classification into everything the dashboard renders.
#[derive(Debug)]
pub struct SummaryBuilder {
    config: ServiceabilityConfig,
    extractor: IsotopeExtractor,
}

impl SummaryBuilder {
    pub fn new(config: ServiceabilityConfig) -> Self {
        let extractor = IsotopeExtractor::new(&config);
        Self { config, extractor }
    }

    pub fn site_report(&self, site: &SiteRecord) -> SiteReport {
        let isotopes = self.extractor.extract(&site.description);
        let verdict = classify(&isotopes);
        SiteReport {
            marker: verdict.marker_style(),
            tooltip: tooltip(site),
            popup: popup_text(site, &isotopes, verdict, self.config.threshold_hours),
            site: site.clone(),
            isotopes,
            serviceability: verdict,
        }
    }

    pub fn build(&self, data: &SourceData) -> DashboardReport {
        let sites: Vec<SiteReport> = data.sites.iter().map(|s| self.site_report(s)).collect();

        let summary = sites
            .iter()
            .map(|r| summary_row(&r.site, &r.isotopes, r.serviceability))
            .collect();
        let legend = sites
            .iter()
            .map(|r| legend_entry(&r.site, &r.isotopes, r.serviceability))
            .collect();

        let distinct_isotopes: HashSet<&str> = sites
            .iter()
            .flat_map(|r| r.isotopes.iter().map(|i| i.symbol.as_str()))
            .collect();
        let countries: HashSet<&str> = data.sites.iter().map(|s| s.country.as_str()).collect();
        let stats = DashboardStats {
            total_sites: data.sites.len(),
            countries: countries.len(),
            gateways: data.gateways.len(),
            isotopes: distinct_isotopes.len(),
            serviceable_sites: sites
                .iter()
                .filter(|r| r.serviceability.is_serviceable())
                .count(),
        };

        DashboardReport {
            generated_at: chrono::Utc::now(),
            threshold_hours: self.config.threshold_hours,
            summary,
            legend,
            gateways: data.gateways.iter().map(gateway_marker).collect(),
            reference: reference_rows(&self.config),
            countries: country_summary(&data.sites),
            stats,
            sites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Coordinates;

    fn site(id: u32, description: &str, country: &str) -> SiteRecord {
        SiteRecord {
            id,
            description: description.to_string(),
            country: country.to_string(),
            coordinates: Coordinates { lat: 52.0, lon: 4.7 },
        }
    }

    #[test]
    fn test_site_name_cuts_paren_then_semicolon() {
        assert_eq!(site_name("Petten reactor (Mo-99, I-131)"), "Petten reactor");
        assert_eq!(site_name("Fleurus; IRE radiochemistry (Mo-99)"), "Fleurus");
        assert_eq!(site_name("  No markers here  "), "No markers here");
        assert_eq!(site_name(""), "");
    }

    #[test]
    fn test_table_name_cuts_en_dash_and_truncates() {
        assert_eq!(table_name("Curium – Petten (Mo-99)"), "Curium");
        let long = "A very long facility name that keeps going (F-18)";
        assert_eq!(table_name(long), "A very long facility name that...");
    }

    #[test]
    fn test_popup_name_truncation() {
        let name = "x".repeat(41);
        let shortened = popup_name(&name);
        assert_eq!(shortened.chars().count(), 40);
        assert!(shortened.ends_with("..."));
        assert_eq!(popup_name(&"y".repeat(40)), "y".repeat(40));
    }

    #[test]
    fn test_verdict_presentation_is_distinct() {
        let verdicts = [
            Serviceability::CanServe,
            Serviceability::CannotServe,
            Serviceability::Partial,
            Serviceability::Unknown,
        ];
        let labels: HashSet<&str> = verdicts.iter().map(|v| v.status_label()).collect();
        let fills: HashSet<String> = verdicts.iter().map(|v| v.marker_style().fill).collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(fills.len(), 4);
        assert_eq!(Serviceability::Partial.marker_style().border, "#92400E");
    }

    #[test]
    fn test_summary_row_lists() {
        let builder = SummaryBuilder::new(ServiceabilityConfig::default());
        let report = builder.site_report(&site(4, "Mixed producer: Lu-177 (6.65d), Ga-68 (67.8min)", "DE"));
        let row = summary_row(&report.site, &report.isotopes, report.serviceability);

        assert_eq!(row.name, "Mixed producer: Lu-177");
        assert_eq!(row.can_serve, "Lu-177");
        assert_eq!(row.cannot_serve, "Ga-68");
        assert_eq!(row.status, "◐ Partial");
    }

    #[test]
    fn test_unknown_site_row_uses_dashes() {
        let builder = SummaryBuilder::new(ServiceabilityConfig::default());
        let report = builder.site_report(&site(9, "No description available", "FR"));
        let row = summary_row(&report.site, &report.isotopes, report.serviceability);

        assert_eq!(report.serviceability, Serviceability::Unknown);
        assert_eq!(row.can_serve, "—");
        assert_eq!(row.cannot_serve, "—");
        assert_eq!(row.status, "? Unknown");
    }

    #[test]
    fn test_popup_and_tooltip() {
        let builder = SummaryBuilder::new(ServiceabilityConfig::default());
        let report = builder.site_report(&site(1, "Petten reactor (Mo-99, Tc-99m)", "Netherlands"));

        assert_eq!(report.tooltip, "Site 1: Netherlands (Click for details)");
        assert!(report.popup.starts_with("Site 1\nPetten reactor\n✓ SERVICEABLE"));
        assert!(report.popup.contains("Mo-99"));
        assert!(report.popup.ends_with("Threshold: ≥6h half-life required for service"));
    }

    #[test]
    fn test_reference_rows_flag_threshold() {
        let rows = reference_rows(&ServiceabilityConfig::default());
        assert_eq!(rows.len(), 14);
        let tc = rows.iter().find(|r| r.symbol == "Tc-99m").unwrap();
        assert!(tc.serviceable);
        assert_eq!(tc.label, "✓ Yes");
        assert_eq!(rows[0].label, "✗ No");
    }

    #[test]
    fn test_country_summary_sorted() {
        let sites = vec![site(7, "", "Germany"), site(2, "", "Belgium"), site(3, "", "Germany")];
        let summary = country_summary(&sites);
        assert_eq!(summary[0].country, "Belgium");
        assert_eq!(summary[1].site_ids, "3, 7");
    }

    #[test]
    fn test_build_stats() {
        let data = SourceData {
            sites: vec![
                site(1, "Mo-99/Tc-99m generator site", "Netherlands"),
                site(2, "PET cyclotron producing F-18 (109.7 min)", "Belgium"),
                site(3, "Mixed producer: Lu-177 (6.65d), Ga-68 (67.8min)", "Netherlands"),
                site(4, "Radiopharmacy", "Austria"),
            ],
            gateways: vec![Gateway {
                code: "VIE".to_string(),
                city: "Vienna".to_string(),
                country: "Austria".to_string(),
                status: "Current".to_string(),
                coordinates: Coordinates { lat: 48.1, lon: 16.6 },
            }],
        };
        let report = SummaryBuilder::new(ServiceabilityConfig::default()).build(&data);

        assert_eq!(
            report.stats,
            DashboardStats {
                total_sites: 4,
                countries: 3,
                gateways: 1,
                isotopes: 5,
                serviceable_sites: 2,
            }
        );
        assert_eq!(report.gateways[0].tooltip, "UPS Gateway: VIE - Vienna");
        let badges = &report.legend[2].badges;
        assert!(badges[0].starts_with("Lu-177 ("));
        assert_eq!(badges[1], "Ga-68 (1.1 h)");
    }
}
