//! Lookup functions - match a tenancy key or building name against the tables
//!
//! Linear scans; the tables are small enough that no index is kept.

use crate::ingestion::types::{ProjectRecord, TenancyRecord};

/// All records registered under `key`, in source order
pub fn find_by_tenancy_key(records: &[TenancyRecord], key: i64) -> Vec<&TenancyRecord> {
    records.iter().filter(|r| r.tenancy_key == key).collect()
}

pub fn exists(records: &[TenancyRecord], key: i64) -> bool {
    records.iter().any(|r| r.tenancy_key == key)
}

/// Project metadata for a building, by exact name. A building with tenancy
/// records but no project entry yields None.
pub fn find_project<'a>(projects: &'a [ProjectRecord], project_name: &str) -> Option<&'a ProjectRecord> {
    projects.iter().find(|p| p.project_name == project_name)
}
