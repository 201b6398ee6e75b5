//! Data ingestion module - fetch and parse the tenancy and project exports

pub mod fetch;
pub mod load;
pub mod parse;
pub mod types;
pub mod utils;

pub use types::*;
