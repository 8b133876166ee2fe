//! Status command - show configured sources

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use kpi_core::config::{Config, SourceOrigin};
use kpi_core::{BusinessVertical, MetricFamily};

use super::get_kpi_dir;
use crate::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceStatus {
    family: MetricFamily,
    business: BusinessVertical,
    url: Option<String>,
    origin: Option<SourceOrigin>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusSummary {
    kpi_dir: String,
    sources: Vec<SourceStatus>,
    http_timeout_secs: u64,
    events_file: String,
}

pub fn run(json: bool) -> Result<()> {
    let kpi_dir = get_kpi_dir()?;
    let config = Config::load(&kpi_dir)?;

    let mut sources = Vec::new();
    for family in MetricFamily::ALL {
        for business in BusinessVertical::ALL {
            let entry = config.sources.get(&(family, business));
            sources.push(SourceStatus {
                family,
                business,
                url: entry.map(|e| e.url.clone()),
                origin: entry.map(|e| e.origin),
            });
        }
    }

    let status = StatusSummary {
        kpi_dir: kpi_dir.display().to_string(),
        sources,
        http_timeout_secs: config.http_timeout.as_secs(),
        events_file: config.events_file.display().to_string(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "KPI Sources".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Family", "Business", "Source", "From"]);
    for source in &status.sources {
        let origin = match source.origin {
            Some(SourceOrigin::Env) => "env",
            Some(SourceOrigin::LegacyEnv) => "env (legacy)",
            Some(SourceOrigin::Settings) => "settings.json",
            None => "-",
        };
        table.add_row(vec![
            source.family.to_string(),
            source.business.to_string(),
            source.url.clone().unwrap_or_else(|| "not configured".to_string()),
            origin.to_string(),
        ]);
    }
    println!("{}", table);
    println!();

    let configured = status.sources.iter().filter(|s| s.url.is_some()).count();
    if configured == 0 {
        output::warning("No sources configured; every dashboard will be empty.");
        println!();
    }

    println!("Directory:    {}", status.kpi_dir);
    println!("HTTP timeout: {}s", status.http_timeout_secs);
    println!("Events file:  {}", status.events_file);

    Ok(())
}
