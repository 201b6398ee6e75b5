//! Property summary - reduce a tenancy key's records to display-ready views

use crate::analysis::field::Field;
use crate::error::{Error, Result};
use crate::ingestion::types::TenancyRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Canonical single-property view of a tenancy key.
///
/// Scalar fields come from the first matched record (source order, which the
/// loader keeps chronological). A key that owns several properties is not merged:
/// `property_ids` lists them all so the caller can tell, and `property_listing`
/// gives one row per property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub tenancy_key: i64,
    pub property_id: i64,
    pub property_ids: Vec<i64>,

    pub area: Field<String>,
    pub project: Field<String>,
    pub usage: Field<String>,
    pub property_size: Field<f64>,
    pub property_type: Field<String>,
    pub property_subtype: Field<String>,
    pub nearest_metro: Field<String>,
    pub nearest_mall: Field<String>,

    /// Earliest start across all matched records
    pub start_date: NaiveDate,
    /// Latest end across all matched records, never later than the evaluation date
    pub end_date: NaiveDate,
    /// True when the latest end was unbounded or in the future
    pub is_ongoing: bool,
}

/// One row of the per-property table under a tenancy key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySummary {
    pub property_id: i64,
    pub area: Field<String>,
    pub project: Field<String>,
    pub usage: Field<String>,
    pub property_size: Field<f64>,
}

impl From<&TenancyRecord> for PropertySummary {
    fn from(record: &TenancyRecord) -> Self {
        PropertySummary {
            property_id: record.property_id,
            area: Field::cloned_from(&record.area),
            project: Field::cloned_from(&record.project),
            usage: Field::cloned_from(&record.usage),
            property_size: record.property_size.into(),
        }
    }
}

/// Build the snapshot for a non-empty set of matched records.
/// `today` bounds the reported end date.
pub fn build_snapshot(matched: &[&TenancyRecord], today: NaiveDate) -> Result<PropertySnapshot> {
    let first = *matched.first().ok_or(Error::EmptySelection)?;

    let start_date = matched
        .iter()
        .map(|r| r.start_date)
        .min()
        .unwrap_or(first.start_date);

    // A null end date is an open-ended tenancy and outranks any bounded one
    let latest_end = if matched.iter().any(|r| r.end_date.is_none()) {
        None
    } else {
        matched.iter().filter_map(|r| r.end_date).max()
    };
    let (end_date, is_ongoing) = match latest_end {
        Some(end) if end <= today => (end, false),
        _ => (today, true),
    };

    Ok(PropertySnapshot {
        tenancy_key: first.tenancy_key,
        property_id: first.property_id,
        property_ids: distinct_property_ids(matched),
        area: Field::cloned_from(&first.area),
        project: Field::cloned_from(&first.project),
        usage: Field::cloned_from(&first.usage),
        property_size: first.property_size.into(),
        property_type: Field::cloned_from(&first.property_type),
        property_subtype: Field::cloned_from(&first.property_subtype),
        nearest_metro: Field::cloned_from(&first.nearest_metro),
        nearest_mall: Field::cloned_from(&first.nearest_mall),
        start_date,
        end_date,
        is_ongoing,
    })
}

/// One summary per distinct property, in order of first appearance. When a
/// property has several records the last one wins, being the latest contract.
pub fn property_listing(matched: &[&TenancyRecord]) -> Vec<PropertySummary> {
    let mut listing: Vec<PropertySummary> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for record in matched {
        let summary = PropertySummary::from(*record);
        match positions.get(&record.property_id) {
            Some(&idx) => listing[idx] = summary,
            None => {
                positions.insert(record.property_id, listing.len());
                listing.push(summary);
            }
        }
    }

    listing
}

fn distinct_property_ids(matched: &[&TenancyRecord]) -> Vec<i64> {
    let mut ids = Vec::new();
    for record in matched {
        if !ids.contains(&record.property_id) {
            ids.push(record.property_id);
        }
    }
    ids
}
