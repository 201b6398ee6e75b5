//! Utility functions for common operations

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::Client;
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Leading bytes of a ZIP local file header
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Date layouts seen in DLD exports, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Download a file via HTTP
pub async fn http_get(url: &str, timeout: Duration) -> Result<Bytes> {
    info!("Downloading from {}", url);
    let client = Client::builder().timeout(timeout).build()?;

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(anyhow::anyhow!("HTTP request failed: {}", status));
    }

    let bytes = response.bytes().await?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Whether a location should be fetched over HTTP rather than read from disk
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Filesystem path of a local location, with an optional `file://` prefix removed
pub fn local_path(location: &str) -> &Path {
    Path::new(location.strip_prefix("file://").unwrap_or(location))
}

pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC)
}

/// Extract the first CSV file from an in-memory ZIP archive.
/// Returns the entry name and its contents.
pub fn extract_csv_from_zip(bytes: &[u8]) -> Result<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    // Find first CSV file
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let filename = file.name().to_string();

        if filename.to_lowercase().ends_with(".csv") {
            info!("Found CSV file: {}", filename);

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .with_context(|| format!("Failed to read {} from archive", filename))?;
            return Ok((filename, contents));
        }
    }

    Err(anyhow::anyhow!("No CSV file found in ZIP archive"))
}

/// Canonical column name: trimmed and lower-cased
pub fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Empty or whitespace-only cells are nulls
pub fn clean_text(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse a date cell; `Ok(None)` for an empty cell, `Err` for an unreadable one
pub fn parse_date(cell: &str) -> Result<Option<NaiveDate>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Ok(Some(date));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(cell, format) {
            return Ok(Some(datetime.date()));
        }
    }

    Err(anyhow::anyhow!("'{}' is not a recognised date", cell))
}

/// Parse an integer cell, accepting integral floats such as `90000.0`
pub fn parse_integer(cell: &str) -> Result<Option<i64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    if let Ok(value) = cell.parse::<i64>() {
        return Ok(Some(value));
    }

    let value = cell
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!("'{}' is not a number", cell))?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(anyhow::anyhow!("'{}' is not an integer", cell));
    }
    Ok(Some(value as i64))
}

/// Parse a float cell; NaN and infinities are rejected
pub fn parse_float(cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    let value = cell
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!("'{}' is not a number", cell))?;
    if !value.is_finite() {
        return Err(anyhow::anyhow!("'{}' is not a finite number", cell));
    }
    Ok(Some(value))
}
