// Library module for testable functions

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod report;
pub mod service;
pub mod session;

pub use error::{Error, Result};

/// Interpret user input as a tenancy (Ejari) number.
/// Empty input is `Ok(None)`: nothing to look up yet.
pub fn parse_tenancy_key(input: &str) -> Result<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| Error::InvalidKey(trimmed.to_string()))
}
