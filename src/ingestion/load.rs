//! Load functions - fetch and parse one source into an immutable table

use crate::error::{Error, Result};
use crate::ingestion::fetch::{fetch_source, FetchPolicy};
use crate::ingestion::parse::{parse_projects, parse_tenancy};
use crate::ingestion::types::{Dataset, ProjectRecord, TenancyRecord};
use chrono::Utc;
use tracing::info;

pub async fn load_tenancy(location: &str, policy: &FetchPolicy) -> Result<Vec<TenancyRecord>> {
    let raw = fetch_source(location, policy)
        .await
        .map_err(|e| Error::source_unavailable(location, e))?;
    parse_tenancy(&raw).map_err(|e| Error::source_unavailable(location, e))
}

pub async fn load_projects(location: &str, policy: &FetchPolicy) -> Result<Vec<ProjectRecord>> {
    let raw = fetch_source(location, policy)
        .await
        .map_err(|e| Error::source_unavailable(location, e))?;
    parse_projects(&raw).map_err(|e| Error::source_unavailable(location, e))
}

/// Load both tables; either failing fails the whole load
pub async fn load_dataset(
    tenancy_location: &str,
    projects_location: &str,
    policy: &FetchPolicy,
) -> Result<Dataset> {
    let tenancy = load_tenancy(tenancy_location, policy).await?;
    let projects = load_projects(projects_location, policy).await?;

    let dataset = Dataset {
        tenancy,
        projects,
        loaded_at: Utc::now(),
    };
    info!("Dataset loaded: {}", dataset);
    Ok(dataset)
}
