//! Report assembly - everything the display layer needs for one tenancy key

use crate::analysis::{
    build_snapshot, exists, find_by_tenancy_key, find_project, price_history, property_listing,
    BuildingComparison, PricePoint, PropertySnapshot, PropertySummary,
};
use crate::error::Result;
use crate::ingestion::types::{Dataset, ProjectRecord, TenancyRecord};
use crate::session::Session;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Charts and building info for one expanded property
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetail {
    pub property_id: i64,
    pub price_history: Vec<PricePoint>,
    pub building: BuildingComparison,
    /// None when the building has no project entry (or no building is known)
    pub project: Option<ProjectRecord>,
    pub project_location: Option<geojson::Geometry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenancyReport {
    pub tenancy_key: i64,
    /// Matched rows, in source order
    pub records: Vec<TenancyRecord>,
    pub snapshot: PropertySnapshot,
    pub properties: Vec<PropertySummary>,
    pub details: Vec<PropertyDetail>,
}

/// Result of one lookup interaction. None of these is an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Nothing entered yet
    Idle,
    /// Input was not a number
    Invalid(String),
    NotFound(i64),
    Found(Box<TenancyReport>),
}

/// Build the report for `tenancy_key`, expanding the properties `session` asks for
pub fn build_report(
    dataset: &Dataset,
    tenancy_key: i64,
    session: &Session,
    today: NaiveDate,
) -> Result<LookupOutcome> {
    if !exists(&dataset.tenancy, tenancy_key) {
        return Ok(LookupOutcome::NotFound(tenancy_key));
    }

    let matched = find_by_tenancy_key(&dataset.tenancy, tenancy_key);
    let snapshot = build_snapshot(&matched, today)?;
    let properties = property_listing(&matched);
    debug!(
        "Tenancy key {} matched {} record(s), {} property id(s)",
        tenancy_key,
        matched.len(),
        properties.len()
    );

    let details = properties
        .iter()
        .filter(|p| session.is_expanded(p.property_id))
        .map(|p| property_detail(dataset, p))
        .collect();

    Ok(LookupOutcome::Found(Box::new(TenancyReport {
        tenancy_key,
        records: matched.into_iter().cloned().collect(),
        snapshot,
        properties,
        details,
    })))
}

fn property_detail(dataset: &Dataset, property: &PropertySummary) -> PropertyDetail {
    let project = property
        .project
        .value()
        .and_then(|name| find_project(&dataset.projects, name))
        .cloned();

    PropertyDetail {
        property_id: property.property_id,
        price_history: price_history(&dataset.tenancy, property.property_id),
        building: BuildingComparison::for_summary(&dataset.tenancy, property),
        project_location: project.as_ref().and_then(|p| p.location()),
        project,
    }
}
