//! Configuration loaded from environment variables (optionally via `.env`)

use crate::cache::SourceKey;
use crate::error::{Error, Result};
use crate::ingestion::fetch::FetchPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub tenancy_data_url: String,
    pub projects_data_url: String,
    pub fetch: FetchPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `lookup` returns None for unset names
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} must be set", name)))
        };
        let defaults = FetchPolicy::default();

        Ok(Config {
            tenancy_data_url: required("TENANCY_DATA_URL")?,
            projects_data_url: required("PROJECTS_DATA_URL")?,
            fetch: FetchPolicy {
                timeout: parse_or("FETCH_TIMEOUT_SECS", &lookup)?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                max_attempts: parse_or("FETCH_MAX_ATTEMPTS", &lookup)?
                    .unwrap_or(defaults.max_attempts),
                initial_backoff: parse_or("FETCH_BACKOFF_MS", &lookup)?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.initial_backoff),
            },
        })
    }

    pub fn source_key(&self) -> SourceKey {
        SourceKey {
            tenancy: self.tenancy_data_url.clone(),
            projects: self.projects_data_url.clone(),
        }
    }
}

fn parse_or<T, F>(name: &str, lookup: &F) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a valid number", name))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let env = vars(&[
            ("TENANCY_DATA_URL", "https://example.com/rent.csv"),
            ("PROJECTS_DATA_URL", "https://example.com/projects.csv"),
        ]);

        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.tenancy_data_url, "https://example.com/rent.csv");
        assert_eq!(config.fetch.timeout, Duration::from_secs(300));
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.source_key().projects, "https://example.com/projects.csv");
    }

    #[test]
    fn test_overrides() {
        let env = vars(&[
            ("TENANCY_DATA_URL", "rent.csv"),
            ("PROJECTS_DATA_URL", "projects.csv"),
            ("FETCH_TIMEOUT_SECS", "30"),
            ("FETCH_MAX_ATTEMPTS", "5"),
            ("FETCH_BACKOFF_MS", "250"),
        ]);

        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.initial_backoff, Duration::from_millis(250));
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let env = vars(&[("TENANCY_DATA_URL", "rent.csv")]);

        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("PROJECTS_DATA_URL"));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let env = vars(&[
            ("TENANCY_DATA_URL", "rent.csv"),
            ("PROJECTS_DATA_URL", "projects.csv"),
            ("FETCH_MAX_ATTEMPTS", "many"),
        ]);

        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());
    }
}
