//! Parse functions - transform raw delimited exports into typed records

use crate::ingestion::types::{ProjectRecord, RawData, TenancyRecord, UnitCount};
use crate::ingestion::utils::{
    clean_text, normalize_header, parse_date, parse_float, parse_integer,
};
use anyhow::{Context, Result};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Field delimiter of both DLD exports
pub const DELIMITER: u8 = b';';

const TENANCY_COLUMNS: &[&str] = &["ecn", "pid", "start_date", "contract_amount", "annual_amount"];
const PROJECT_COLUMNS: &[&str] = &["project_name"];

/// Tenancy CSV row structure (after header normalization)
#[derive(Debug, Deserialize)]
struct TenancyRow {
    ecn: Option<String>,
    pid: Option<String>,
    registration_date: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    version: Option<String>,
    area: Option<String>,
    contract_amount: Option<String>,
    annual_amount: Option<String>,
    property_size: Option<String>,
    project: Option<String>,
    usage: Option<String>,
    property_type: Option<String>,
    property_subtype: Option<String>,
    nearest_metro: Option<String>,
    nearest_mall: Option<String>,
}

/// Projects CSV row structure (after header normalization)
#[derive(Debug, Deserialize)]
struct ProjectRow {
    project_name: Option<String>,
    developer_name: Option<String>,
    start_date: Option<String>,
    completion_date: Option<String>,
    area: Option<String>,
    total_units: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

/// Parse the tenancy export into TenancyRecord structs
pub fn parse_tenancy(raw: &RawData) -> Result<Vec<TenancyRecord>> {
    let bytes = raw.as_bytes();
    log_source("tenancy", raw);

    let rows: Vec<(usize, TenancyRow)> = read_rows(bytes, TENANCY_COLUMNS)?;
    let mut records = Vec::with_capacity(rows.len());
    for (line, row) in rows {
        let record =
            parse_tenancy_row(row).with_context(|| format!("Invalid tenancy row at line {}", line))?;
        records.push(record);
    }

    ensure_chronological(&mut records);

    info!("Parsed {} tenancy records", records.len());
    Ok(records)
}

/// Parse the projects export into ProjectRecord structs
pub fn parse_projects(raw: &RawData) -> Result<Vec<ProjectRecord>> {
    let bytes = raw.as_bytes();
    log_source("projects", raw);

    let rows: Vec<(usize, ProjectRow)> = read_rows(bytes, PROJECT_COLUMNS)?;
    let mut projects = Vec::with_capacity(rows.len());
    let mut seen = HashSet::new();
    for (line, row) in rows {
        let project =
            parse_project_row(row).with_context(|| format!("Invalid project row at line {}", line))?;
        if !seen.insert(project.project_name.clone()) {
            warn!(
                "Duplicate project name '{}' at line {}; first occurrence wins",
                project.project_name, line
            );
        }
        projects.push(project);
    }

    info!("Parsed {} project records", projects.len());
    Ok(projects)
}

fn log_source(table: &str, raw: &RawData) {
    match raw {
        RawData::Bytes(bytes) => info!("Parsing {} CSV ({} bytes)", table, bytes.len()),
        RawData::Extracted { entry, bytes } => {
            info!("Parsing {} CSV {} ({} bytes)", table, entry, bytes.len())
        }
    }
}

/// Deserialize every row after lower-casing the header, failing on the first bad row.
/// Returns each row with its 1-based line number.
fn read_rows<T: DeserializeOwned>(bytes: &[u8], required: &[&str]) -> Result<Vec<(usize, T)>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(anyhow::anyhow!("Missing required column '{}'", column));
        }
    }
    reader.set_headers(headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        let line = idx + 2; // header is line 1
        let row = result.with_context(|| format!("Failed to deserialize line {}", line))?;
        rows.push((line, row));
    }
    Ok(rows)
}

fn parse_tenancy_row(row: TenancyRow) -> Result<TenancyRecord> {
    let contract_amount = required_integer(row.contract_amount.as_deref(), "contract_amount")?;
    let annual_amount = required_integer(row.annual_amount.as_deref(), "annual_amount")?;
    if contract_amount < 0 || annual_amount < 0 {
        return Err(anyhow::anyhow!(
            "Negative amount (contract: {}, annual: {})",
            contract_amount,
            annual_amount
        ));
    }

    let property_size = optional(row.property_size.as_deref(), parse_float, "property_size")?;
    if let Some(size) = property_size {
        if size < 0.0 {
            return Err(anyhow::anyhow!("Negative property_size {}", size));
        }
    }

    let start_date = optional(row.start_date.as_deref(), parse_date, "start_date")?
        .ok_or_else(|| anyhow::anyhow!("Missing value in column 'start_date'"))?;

    Ok(TenancyRecord {
        tenancy_key: required_integer(row.ecn.as_deref(), "ecn")?,
        property_id: required_integer(row.pid.as_deref(), "pid")?,
        registration_date: optional(
            row.registration_date.as_deref(),
            parse_date,
            "registration_date",
        )?,
        start_date,
        end_date: optional(row.end_date.as_deref(), parse_date, "end_date")?,
        version: clean_text(row.version),
        contract_amount,
        annual_amount,
        property_size,
        area: clean_text(row.area),
        project: clean_text(row.project),
        usage: clean_text(row.usage),
        property_type: clean_text(row.property_type),
        property_subtype: clean_text(row.property_subtype),
        nearest_metro: clean_text(row.nearest_metro),
        nearest_mall: clean_text(row.nearest_mall),
    })
}

fn parse_project_row(row: ProjectRow) -> Result<ProjectRecord> {
    let project_name = clean_text(row.project_name)
        .ok_or_else(|| anyhow::anyhow!("Missing value in column 'project_name'"))?;

    Ok(ProjectRecord {
        project_name,
        developer_name: clean_text(row.developer_name),
        start_date: optional(row.start_date.as_deref(), parse_date, "start_date")?,
        completion_date: optional(row.completion_date.as_deref(), parse_date, "completion_date")?,
        area: clean_text(row.area),
        total_units: UnitCount::from_source(optional(
            row.total_units.as_deref(),
            parse_integer,
            "total_units",
        )?),
        latitude: optional(row.latitude.as_deref(), parse_float, "latitude")?,
        longitude: optional(row.longitude.as_deref(), parse_float, "longitude")?,
    })
}

fn optional<T, F>(cell: Option<&str>, parse: F, column: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Result<Option<T>>,
{
    match cell {
        Some(cell) => parse(cell).with_context(|| format!("Bad value in column '{}'", column)),
        None => Ok(None),
    }
}

fn required_integer(cell: Option<&str>, column: &str) -> Result<i64> {
    optional(cell, parse_integer, column)?
        .ok_or_else(|| anyhow::anyhow!("Missing value in column '{}'", column))
}

/// Make sure every property's records are in non-decreasing start_date order.
/// The export is normally chronological; if it is not, the whole table is
/// stably sorted by start_date so ties keep their source order.
fn ensure_chronological(records: &mut [TenancyRecord]) {
    let mut last_start = std::collections::HashMap::new();
    let mut out_of_order = 0usize;
    for record in records.iter() {
        if let Some(previous) = last_start.insert(record.property_id, record.start_date) {
            if previous > record.start_date {
                out_of_order += 1;
            }
        }
    }

    if out_of_order > 0 {
        warn!(
            "{} tenancy records out of start_date order; sorting table",
            out_of_order
        );
        records.sort_by_key(|r| r.start_date);
    }
}
