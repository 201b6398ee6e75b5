//! Error types for the tenancy lookup
//!
//! Only a failed source load is a hard stop. An unknown tenancy key, missing
//! fields and empty building comparisons are ordinary outcomes and are not
//! represented here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A tabular source could not be fetched or parsed
    #[error("Data unavailable from {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// User input is not a tenancy key
    #[error("'{0}' is NOT a number")]
    InvalidKey(String),

    /// A snapshot was requested for an empty record set
    #[error("No tenancy records to summarise")]
    EmptySelection,

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn source_unavailable(location: &str, err: anyhow::Error) -> Self {
        Error::SourceUnavailable {
            location: location.to_string(),
            reason: format!("{:#}", err),
        }
    }
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;
