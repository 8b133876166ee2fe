//! CLI command implementations

pub mod calendar;
pub mod dashboard;
pub mod parse;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use kpi_core::services::SeriesOrder;
use kpi_core::KpiContext;

/// Get the kpi directory from environment or default
pub fn get_kpi_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("KPI_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".kpi"))
}

/// Get or create kpi context
pub fn get_context() -> Result<KpiContext> {
    let kpi_dir = get_kpi_dir()?;

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&kpi_dir)
        .with_context(|| format!("Failed to create kpi directory: {:?}", kpi_dir))?;

    KpiContext::new(&kpi_dir)
}

pub fn series_order(chronological: bool) -> SeriesOrder {
    if chronological {
        SeriesOrder::Chronological
    } else {
        SeriesOrder::AsGiven
    }
}
