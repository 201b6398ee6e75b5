//! Core data types for the ingestion pipeline
//! Pure data structures with no behavior beyond simple accessors

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Raw data from a source location - tagged unions
#[derive(Debug)]
pub enum RawData {
    Bytes(Bytes),
    /// CSV entry unpacked from a ZIP archive
    Extracted { entry: String, bytes: Vec<u8> },
}

impl RawData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawData::Bytes(bytes) => &bytes[..],
            RawData::Extracted { bytes, .. } => &bytes[..],
        }
    }
}

/// One registered contract period for a property (a row of the tenancy export)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenancyRecord {
    // Core identification
    pub tenancy_key: i64,
    pub property_id: i64,

    // Contract period
    pub registration_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>, // None = unbounded
    pub version: Option<String>,     // New / Renewed

    // Financial data
    pub contract_amount: i64,
    pub annual_amount: i64,

    // Property attributes
    pub property_size: Option<f64>, // sq.m
    pub area: Option<String>,
    pub project: Option<String>,
    pub usage: Option<String>,
    pub property_type: Option<String>,
    pub property_subtype: Option<String>,

    // Surroundings
    pub nearest_metro: Option<String>,
    pub nearest_mall: Option<String>,
}

/// Unit count of a project with the "was missing" flag kept apart from zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitCount {
    pub value: i64,
    pub was_missing: bool,
}

impl UnitCount {
    pub fn from_source(value: Option<i64>) -> Self {
        match value {
            Some(value) => UnitCount {
                value,
                was_missing: false,
            },
            None => UnitCount {
                value: 0,
                was_missing: true,
            },
        }
    }
}

/// One building/complex (a row of the projects export)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub project_name: String,
    pub developer_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub area: Option<String>,
    pub total_units: UnitCount,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ProjectRecord {
    /// Stored coordinates as a GeoJSON point (longitude first, per RFC 7946)
    pub fn location(&self) -> Option<geojson::Geometry> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(geojson::Geometry::new(geojson::Value::Point(vec![
                lon, lat,
            ]))),
            _ => None,
        }
    }
}

/// Both tables of one load, immutable once built
#[derive(Debug, Clone)]
pub struct Dataset {
    pub tenancy: Vec<TenancyRecord>,
    pub projects: Vec<ProjectRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tenancy records: {}, projects: {}, loaded at: {}",
            self.tenancy.len(),
            self.projects.len(),
            self.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
