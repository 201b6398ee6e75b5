//! Building comparison - annual rent statistics per unit size within a building

use crate::analysis::field::Field;
use crate::analysis::snapshot::{PropertySnapshot, PropertySummary};
use crate::analysis::stats::Summary;
use crate::ingestion::types::TenancyRecord;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Half-width of the "similar size" band, in sq.m
pub const SIMILAR_SIZE_BAND_SQM: f64 = 10.0;

/// Property size as a totally ordered bucket key
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct PropertySize(f64);

impl PropertySize {
    pub fn new(size: f64) -> Self {
        // fold -0.0 into 0.0 so both land in one bucket
        PropertySize(if size == 0.0 { 0.0 } else { size })
    }

    pub fn sqm(&self) -> f64 {
        self.0
    }
}

impl PartialEq for PropertySize {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertySize {}

impl PartialOrd for PropertySize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertySize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Rent statistics for all matching units of one size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingStatBucket {
    pub project_name: String,
    pub usage: String,
    pub property_size: f64,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

/// Buckets for one building+usage filter, ascending by size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeDistribution {
    pub project_name: String,
    pub usage: String,
    /// Size of the property being compared, if known
    pub reference_size: Option<f64>,
    /// Every filtered record, including those without a size
    pub overall: Option<Summary>,
    #[serde(serialize_with = "buckets_in_order")]
    pub buckets: BTreeMap<PropertySize, BuildingStatBucket>,
}

impl SizeDistribution {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, size: f64) -> Option<&BuildingStatBucket> {
        self.buckets.get(&PropertySize::new(size))
    }

    /// Ascending by size
    pub fn iter(&self) -> impl Iterator<Item = &BuildingStatBucket> {
        self.buckets.values()
    }

    /// Whether `bucket` is the compared property's own size
    pub fn is_reference(&self, bucket: &BuildingStatBucket) -> bool {
        self.reference_size
            .map(|size| PropertySize::new(size) == PropertySize::new(bucket.property_size))
            .unwrap_or(false)
    }

    pub fn with_reference(mut self, size: Option<f64>) -> Self {
        self.reference_size = size;
        self
    }
}

fn buckets_in_order<S: Serializer>(
    buckets: &BTreeMap<PropertySize, BuildingStatBucket>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(buckets.values())
}

/// Size buckets for every unit in `project_name` with the given usage
pub fn size_distribution(
    records: &[TenancyRecord],
    project_name: &str,
    usage: &str,
) -> SizeDistribution {
    distribution(records, project_name, usage, None)
}

/// Size buckets restricted to [reference_size - 10, reference_size + 10] sq.m
pub fn similar_size_distribution(
    records: &[TenancyRecord],
    project_name: &str,
    usage: &str,
    reference_size: f64,
) -> SizeDistribution {
    let band = (
        reference_size - SIMILAR_SIZE_BAND_SQM,
        reference_size + SIMILAR_SIZE_BAND_SQM,
    );
    distribution(records, project_name, usage, Some(band)).with_reference(Some(reference_size))
}

fn distribution(
    records: &[TenancyRecord],
    project_name: &str,
    usage: &str,
    band: Option<(f64, f64)>,
) -> SizeDistribution {
    let in_band = |size: Option<f64>| match (band, size) {
        (None, _) => true,
        (Some((low, high)), Some(size)) => size >= low && size <= high,
        (Some(_), None) => false,
    };

    let filtered: Vec<&TenancyRecord> = records
        .iter()
        .filter(|r| r.project.as_deref() == Some(project_name))
        .filter(|r| r.usage.as_deref() == Some(usage))
        .filter(|r| in_band(r.property_size))
        .collect();

    let mut groups: BTreeMap<PropertySize, Vec<i64>> = BTreeMap::new();
    for record in &filtered {
        if let Some(size) = record.property_size {
            groups
                .entry(PropertySize::new(size))
                .or_default()
                .push(record.annual_amount);
        }
    }

    let buckets = groups
        .into_iter()
        .filter_map(|(size, amounts)| {
            let summary = Summary::of(&amounts)?;
            Some((
                size,
                BuildingStatBucket {
                    project_name: project_name.to_string(),
                    usage: usage.to_string(),
                    property_size: size.sqm(),
                    count: summary.count,
                    mean: summary.mean,
                    median: summary.median,
                },
            ))
        })
        .collect();

    let amounts: Vec<i64> = filtered.iter().map(|r| r.annual_amount).collect();

    SizeDistribution {
        project_name: project_name.to_string(),
        usage: usage.to_string(),
        reference_size: None,
        overall: Summary::of(&amounts),
        buckets,
    }
}

/// Why a property cannot be compared with its building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBuildingInfo {
    Project,
    Usage,
}

/// Both building charts for one property, or the "nothing to show" state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildingComparison {
    NothingToShow {
        missing: MissingBuildingInfo,
    },
    Available {
        full: SizeDistribution,
        /// Absent when the property's own size is unknown
        similar: Option<SizeDistribution>,
    },
}

impl BuildingComparison {
    /// Compare a property against its building. A missing project or usage
    /// short-circuits without filtering on a null key.
    pub fn for_property(
        records: &[TenancyRecord],
        project: &Field<String>,
        usage: &Field<String>,
        property_size: &Field<f64>,
    ) -> Self {
        let project_name = match project.value() {
            Some(name) => name,
            None => {
                return BuildingComparison::NothingToShow {
                    missing: MissingBuildingInfo::Project,
                }
            }
        };
        let usage = match usage.value() {
            Some(usage) => usage,
            None => {
                return BuildingComparison::NothingToShow {
                    missing: MissingBuildingInfo::Usage,
                }
            }
        };

        let size = property_size.value().copied();
        let full = size_distribution(records, project_name, usage).with_reference(size);
        let similar = size.map(|s| similar_size_distribution(records, project_name, usage, s));

        BuildingComparison::Available { full, similar }
    }

    pub fn for_snapshot(records: &[TenancyRecord], snapshot: &PropertySnapshot) -> Self {
        Self::for_property(
            records,
            &snapshot.project,
            &snapshot.usage,
            &snapshot.property_size,
        )
    }

    pub fn for_summary(records: &[TenancyRecord], summary: &PropertySummary) -> Self {
        Self::for_property(records, &summary.project, &summary.usage, &summary.property_size)
    }

    /// False when there is nothing to plot at all
    pub fn has_data(&self) -> bool {
        match self {
            BuildingComparison::NothingToShow { .. } => false,
            BuildingComparison::Available { full, .. } => !full.is_empty(),
        }
    }
}
