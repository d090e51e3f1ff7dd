use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: u32,
    pub description: String,
    pub country: String,
    pub coordinates: Coordinates,
}

/// Shipping-network origin point, co-displayed with the sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gateway {
    pub code: String,
    pub city: String,
    pub country: String,
    pub status: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeReferenceEntry {
    pub symbol: String,
    pub half_life_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedIsotope {
    pub symbol: String,
    pub half_life_hours: f64,
    pub half_life_display: String,
    pub can_serve: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Serviceability {
    CanServe,
    CannotServe,
    Partial,
    Unknown,
}

/// Raw input as handed over by the record loader.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub sites: Vec<SiteRecord>,
    pub gateways: Vec<Gateway>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub fill: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub site_id: u32,
    pub name: String,
    pub can_serve: String,
    pub cannot_serve: String,
    pub status: String,
}

/// Everything the map surface needs for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteReport {
    pub site: SiteRecord,
    pub isotopes: Vec<ExtractedIsotope>,
    pub serviceability: Serviceability,
    pub marker: MarkerStyle,
    pub tooltip: String,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMarker {
    pub gateway: Gateway,
    pub radius_m: f64,
    pub color: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub symbol: String,
    pub half_life_hours: f64,
    pub display: String,
    pub serviceable: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub country: String,
    pub site_ids: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub site_id: u32,
    pub text: String,
    pub marker: MarkerStyle,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_sites: usize,
    pub countries: usize,
    pub gateways: usize,
    pub isotopes: usize,
    pub serviceable_sites: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub threshold_hours: f64,
    pub sites: Vec<SiteReport>,
    pub summary: Vec<SummaryRow>,
    pub gateways: Vec<GatewayMarker>,
    pub reference: Vec<ReferenceRow>,
    pub countries: Vec<CountrySummary>,
    pub legend: Vec<LegendEntry>,
    pub stats: DashboardStats,
}

/// Where the loader reads its three tables from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSource {
    Csv {
        sites: String,
        legend: Option<String>,
        gateways: Option<String>,
    },
    Workbook {
        path: String,
    },
}
