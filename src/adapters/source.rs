//! Record loader: turns CSV files or workbook sheets into typed site and
//! gateway records, rejecting malformed rows before the isotope services run.

use crate::domain::model::{Coordinates, Gateway, InputSource, SiteRecord, SourceData};
use crate::domain::ports::Storage;
use crate::utils::error::{DashboardError, Result};
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

pub const SITES_SHEET: &str = "Manufacturers";
pub const LEGEND_SHEET: &str = "Legend";
pub const GATEWAYS_SHEET: &str = "UPS_Gateways";

/// Description given to sites the legend does not mention.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// One data row keyed by trimmed header, with its 1-based row number in the source.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub row: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn require(&self, source_name: &str, column: &str) -> Result<&str> {
        self.get(column).ok_or_else(|| DashboardError::InvalidRecord {
            source_name: source_name.to_string(),
            row: self.row,
            reason: format!("missing value for column '{}'", column),
        })
    }

    fn require_f64(&self, source_name: &str, column: &str) -> Result<f64> {
        let raw = self.require(source_name, column)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DashboardError::InvalidRecord {
                source_name: source_name.to_string(),
                row: self.row,
                reason: format!("'{}' is not a number in column '{}'", raw, column),
            })
    }

    /// Spreadsheet cells often carry integer ids as floats (`3` vs `3.0`).
    fn require_id(&self, source_name: &str) -> Result<u32> {
        let raw = self.require(source_name, "ID")?;
        raw.parse::<u32>()
            .ok()
            .or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
                    .map(|v| v as u32)
            })
            .ok_or_else(|| DashboardError::InvalidRecord {
                source_name: source_name.to_string(),
                row: self.row,
                reason: format!("ID '{}' is not a non-negative integer", raw),
            })
    }

    fn coordinates(&self, source_name: &str) -> Result<Coordinates> {
        let lat = self.require_f64(source_name, "Latitude")?;
        let lon = self.require_f64(source_name, "Longitude")?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(DashboardError::InvalidRecord {
                source_name: source_name.to_string(),
                row: self.row,
                reason: format!("coordinates ({}, {}) are out of range", lat, lon),
            });
        }
        Ok(Coordinates { lat, lon })
    }
}

fn collect_row(row: usize, headers: &[String], values: impl Iterator<Item = String>) -> Option<RawRow> {
    let fields: HashMap<String, String> = headers
        .iter()
        .cloned()
        .zip(values.map(|v| v.trim().to_string()))
        .collect();

    // Blank lines in exported sheets are padding, not records
    if fields.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row, fields })
}

/// Rows with more fields than headers are rejected; an unquoted comma in a
/// description would otherwise shift text into a column that does not exist.
pub fn parse_csv_rows(source_name: &str, data: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(DashboardError::InvalidRecord {
                source_name: source_name.to_string(),
                row: idx + 2,
                reason: format!(
                    "{} fields but only {} columns; quote values that contain commas",
                    record.len(),
                    headers.len()
                ),
            });
        }
        if let Some(row) = collect_row(idx + 2, &headers, record.iter().map(str::to_string)) {
            rows.push(row);
        }
    }
    Ok(rows)
}

pub fn parse_sheet_rows(workbook: &[u8], sheet: &str) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(workbook))?;
    let range = workbook.worksheet_range(sheet)?;

    let mut cells = range.rows();
    let headers: Vec<String> = match cells.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    Ok(cells
        .enumerate()
        .filter_map(|(idx, row_cells)| {
            collect_row(idx + 2, &headers, row_cells.iter().map(|cell| cell.to_string()))
        })
        .collect())
}

pub fn legend_from_rows(source_name: &str, rows: &[RawRow]) -> Result<HashMap<u32, String>> {
    let mut legend = HashMap::new();
    for row in rows {
        let id = row.require_id(source_name)?;
        let description = row.get("Description").unwrap_or_default().to_string();
        if legend.insert(id, description).is_some() {
            tracing::warn!("{} lists site {} more than once, keeping the last entry", source_name, id);
        }
    }
    Ok(legend)
}

/// Sites take their description from `legend` when given, else from their own
/// `Description` column, else [`MISSING_DESCRIPTION`].
pub fn sites_from_rows(
    source_name: &str,
    rows: &[RawRow],
    legend: Option<&HashMap<u32, String>>,
) -> Result<Vec<SiteRecord>> {
    let mut seen = HashSet::new();
    let mut sites = Vec::with_capacity(rows.len());

    for row in rows {
        let id = row.require_id(source_name)?;
        if !seen.insert(id) {
            return Err(DashboardError::InvalidRecord {
                source_name: source_name.to_string(),
                row: row.row,
                reason: format!("duplicate site ID {}", id),
            });
        }

        let description = match legend {
            Some(legend) => legend.get(&id).cloned(),
            None => row.get("Description").map(str::to_string),
        }
        .unwrap_or_else(|| {
            tracing::debug!("Site {} has no description", id);
            MISSING_DESCRIPTION.to_string()
        });

        sites.push(SiteRecord {
            id,
            description,
            country: row.require(source_name, "Country")?.to_string(),
            coordinates: row.coordinates(source_name)?,
        });
    }
    Ok(sites)
}

pub fn gateways_from_rows(source_name: &str, rows: &[RawRow]) -> Result<Vec<Gateway>> {
    rows.iter()
        .map(|row| {
            Ok(Gateway {
                code: row.require(source_name, "Code")?.to_string(),
                city: row.require(source_name, "City")?.to_string(),
                country: row.get("Country").unwrap_or_default().to_string(),
                status: row.get("Status").unwrap_or_default().to_string(),
                coordinates: row.coordinates(source_name)?,
            })
        })
        .collect()
}

async fn read_csv<S: Storage>(storage: &S, path: &str) -> Result<Vec<RawRow>> {
    let data = storage.read_file(path).await?;
    let rows = parse_csv_rows(path, &data)?;
    tracing::debug!("Read {} rows from {}", rows.len(), path);
    Ok(rows)
}

pub async fn load_source<S: Storage>(storage: &S, input: &InputSource) -> Result<SourceData> {
    match input {
        InputSource::Csv {
            sites,
            legend,
            gateways,
        } => {
            let legend = match legend {
                Some(path) => Some(legend_from_rows(path, &read_csv(storage, path).await?)?),
                None => None,
            };
            let site_rows = read_csv(storage, sites).await?;
            let sites = sites_from_rows(sites, &site_rows, legend.as_ref())?;
            let gateways = match gateways {
                Some(path) => gateways_from_rows(path, &read_csv(storage, path).await?)?,
                None => Vec::new(),
            };
            Ok(SourceData { sites, gateways })
        }
        InputSource::Workbook { path } => {
            let data = storage.read_file(path).await?;
            let legend = legend_from_rows(LEGEND_SHEET, &parse_sheet_rows(&data, LEGEND_SHEET)?)?;
            let sites = sites_from_rows(
                SITES_SHEET,
                &parse_sheet_rows(&data, SITES_SHEET)?,
                Some(&legend),
            )?;
            let gateways = gateways_from_rows(GATEWAYS_SHEET, &parse_sheet_rows(&data, GATEWAYS_SHEET)?)?;
            Ok(SourceData { sites, gateways })
        }
    }
}
