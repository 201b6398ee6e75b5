//! Analysis module - turn loaded tables into the slices each display panel needs

pub mod building;
pub mod field;
pub mod history;
pub mod lookup;
pub mod snapshot;
pub mod stats;

pub use building::{
    similar_size_distribution, size_distribution, BuildingComparison, BuildingStatBucket,
    MissingBuildingInfo, PropertySize, SizeDistribution, SIMILAR_SIZE_BAND_SQM,
};
pub use field::{Field, MISSING_DATA};
pub use history::{price_history, PricePoint};
pub use lookup::{exists, find_by_tenancy_key, find_project};
pub use snapshot::{build_snapshot, property_listing, PropertySnapshot, PropertySummary};
pub use stats::Summary;
