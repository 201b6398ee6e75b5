//! Lookup service - one long-lived instance owning the dataset cache

use crate::cache::DatasetCache;
use crate::config::Config;
use crate::error::Result;
use crate::ingestion::load::load_dataset;
use crate::ingestion::types::Dataset;
use crate::parse_tenancy_key;
use crate::report::{build_report, LookupOutcome};
use crate::session::Session;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct TenancyLookup {
    config: Config,
    cache: DatasetCache,
}

impl TenancyLookup {
    pub fn new(config: Config) -> Self {
        TenancyLookup {
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured dataset, loading it on first use
    pub async fn dataset(&self) -> Result<Arc<Dataset>> {
        let key = self.config.source_key();
        self.cache
            .get_or_load(&key, || {
                load_dataset(&key.tenancy, &key.projects, &self.config.fetch)
            })
            .await
    }

    /// Run one lookup for raw user input.
    ///
    /// Empty and non-numeric input are answered without touching the data.
    /// Only a failed dataset load is returned as an error.
    pub async fn lookup(&self, input: &str, session: &Session) -> Result<LookupOutcome> {
        let tenancy_key = match parse_tenancy_key(input) {
            Ok(Some(key)) => key,
            Ok(None) => return Ok(LookupOutcome::Idle),
            Err(e) => {
                warn!("Rejected lookup input: {}", e);
                return Ok(LookupOutcome::Invalid(input.trim().to_string()));
            }
        };

        let dataset = self.dataset().await?;
        let outcome = build_report(&dataset, tenancy_key, session, Utc::now().date_naive())?;

        match &outcome {
            LookupOutcome::NotFound(key) => info!("Tenancy key {} not found", key),
            LookupOutcome::Found(report) => info!(
                "Tenancy key {} found: {} record(s), {} detail panel(s)",
                report.tenancy_key,
                report.records.len(),
                report.details.len()
            ),
            _ => {}
        }

        Ok(outcome)
    }

    /// User-triggered invalidation; the next lookup reloads from source
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
