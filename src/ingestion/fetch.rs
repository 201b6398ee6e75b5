//! Fetch functions - retrieve raw data from a source location

use crate::ingestion::types::RawData;
use crate::ingestion::utils::{extract_csv_from_zip, http_get, is_remote, is_zip, local_path};
use anyhow::{Context, Result};
use bytes::Bytes;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout and retry settings for one source fetch
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy {
            timeout: Duration::from_secs(300), // 5 min timeout
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl FetchPolicy {
    /// Delay before retry number `attempt` (1-based), doubling each time
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

/// Fetch a delimited export, unpacking it if it arrives as a ZIP archive
pub async fn fetch_source(location: &str, policy: &FetchPolicy) -> Result<RawData> {
    info!("Fetching source data from {}", location);

    let bytes = fetch_with_retry(location, policy).await?;

    if is_zip(&bytes) {
        info!("Source is a ZIP archive, extracting CSV");
        let (entry, bytes) = extract_csv_from_zip(&bytes)?;
        return Ok(RawData::Extracted { entry, bytes });
    }

    Ok(RawData::Bytes(bytes))
}

async fn fetch_with_retry(location: &str, policy: &FetchPolicy) -> Result<Bytes> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetch_once(location, policy.timeout).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    "Fetch attempt {}/{} for {} failed: {:#}; retrying in {:?}",
                    attempt, max_attempts, location, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!(
                    "giving up on {} after {} attempt(s)",
                    location, attempt
                )))
            }
        }
    }
}

async fn fetch_once(location: &str, timeout: Duration) -> Result<Bytes> {
    if is_remote(location) {
        return http_get(location, timeout).await;
    }

    let path = local_path(location);
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(Bytes::from(contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn quick_policy() -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(5),
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("rent.csv");
        std::fs::write(&path, "ecn;pid\n1;2\n").unwrap();

        let raw = fetch_source(path.to_str().unwrap(), &quick_policy())
            .await
            .unwrap();
        assert!(matches!(raw, RawData::Bytes(_)));
        assert_eq!(raw.as_bytes(), b"ecn;pid\n1;2\n");
    }

    #[tokio::test]
    async fn test_fetch_zipped_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("rent.zip");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("rent.csv", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"ecn;pid\n1;2\n").unwrap();
            writer.finish().unwrap();
        }

        let location = format!("file://{}", path.display());
        let raw = fetch_source(&location, &quick_policy()).await.unwrap();
        match &raw {
            RawData::Extracted { entry, .. } => assert_eq!(entry, "rent.csv"),
            other => panic!("Expected Extracted, got {:?}", other),
        }
        assert_eq!(raw.as_bytes(), b"ecn;pid\n1;2\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails_after_retries() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("absent.csv");

        let err = fetch_source(path.to_str().unwrap(), &quick_policy())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("after 2 attempt(s)"));
    }

    #[tokio::test]
    #[ignore] // Ignore by default since it hits the network
    async fn test_fetch_unreachable_host() {
        let result = fetch_source("http://127.0.0.1:9/rent.csv", &quick_policy()).await;
        assert!(result.is_err());
    }
}
