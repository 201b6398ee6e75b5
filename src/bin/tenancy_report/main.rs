//! Tenancy report - run one lookup and hand the results to a renderer as JSON
//!
//! Usage: tenancy-report <ejari-number> [property-id ...]
//! Without property ids, every property registered under the number is expanded.
//! Logs go to stderr; stdout carries only the report.

use anyhow::{Context, Result};
use dubai_tenancy_lookup::config::Config;
use dubai_tenancy_lookup::report::LookupOutcome;
use dubai_tenancy_lookup::service::TenancyLookup;
use dubai_tenancy_lookup::session::Session;
use std::env;
use std::io::Write;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let args: Vec<String> = env::args().skip(1).collect();
    let input = args.first().cloned().unwrap_or_default();
    let requested = args
        .iter()
        .skip(1)
        .map(|pid| {
            pid.parse::<i64>()
                .with_context(|| format!("Property id '{}' must be a number", pid))
        })
        .collect::<Result<Vec<i64>>>()?;

    let service = TenancyLookup::new(config);

    let session = if requested.is_empty() {
        // first pass only discovers which properties the key owns
        match service.lookup(&input, &Session::new()).await? {
            LookupOutcome::Found(report) => {
                Session::expanding(report.properties.iter().map(|p| p.property_id))
            }
            other => return emit(&other),
        }
    } else {
        Session::expanding(requested)
    };

    let outcome = service.lookup(&input, &session).await?;
    emit(&outcome)
}

fn emit(outcome: &LookupOutcome) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, outcome).context("Failed to write report")?;
    writeln!(out)?;
    Ok(())
}
