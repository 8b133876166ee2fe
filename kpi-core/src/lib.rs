//! KPI Core - aggregation engine for the intern portal dashboards
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (MetricRow, CalendarEvent, etc.)
//! - **ingest**: Spreadsheet text -> MetricRows (tokenizer, columns, numbers, rows)
//! - **ports**: Trait definitions for external dependencies (SheetSource, EventStore)
//! - **services**: Series building, presentation, dashboards, calendar
//! - **adapters**: Concrete implementations (HTTP, JSON file, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod ports;
pub mod services;

use std::path::Path;

use anyhow::Result;

use adapters::{HttpSheetSource, JsonEventStore};
use config::Config;
use services::{CalendarService, DashboardService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{BusinessVertical, CalendarEvent, MetricFamily, MetricKind, MetricRow};
pub use services::{DashboardPayload, MetricPayload, SeriesOrder};

/// Main context for KPI operations
///
/// Holds the loaded configuration and the services wired to the
/// production adapters.
pub struct KpiContext {
    pub config: Config,
    pub dashboard_service: DashboardService<HttpSheetSource>,
    pub calendar_service: CalendarService<JsonEventStore>,
}

impl KpiContext {
    /// Create a new context from a kpi directory
    pub fn new(kpi_dir: &Path) -> Result<Self> {
        let config = Config::load(kpi_dir)?;

        let source = HttpSheetSource::new(config.http_timeout)?;
        let dashboard_service = DashboardService::new(source, config.clone());
        let calendar_service = CalendarService::new(JsonEventStore::new(&config.events_file));

        Ok(Self {
            config,
            dashboard_service,
            calendar_service,
        })
    }
}
