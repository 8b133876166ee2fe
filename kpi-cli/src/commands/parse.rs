//! Parse command - run a local CSV export through the pipeline

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use kpi_core::ingest::{map_family, tokenize};
use kpi_core::services::{payloads_from_text, SeriesBuilder};
use kpi_core::MetricFamily;

use super::dashboard::print_monthly;
use super::series_order;
use crate::output::{self, format_rate, format_value};

pub fn run(file: &Path, family: &str, chronological: bool, json: bool) -> Result<()> {
    let family = MetricFamily::parse(family).with_context(|| {
        format!(
            "Unknown family '{}'. Expected one of: membership, partner, sales",
            family
        )
    })?;

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let builder = SeriesBuilder::new().with_order(series_order(chronological));
    let payloads = payloads_from_text(&text, family, &builder);

    if json {
        println!("{}", serde_json::to_string_pretty(&payloads)?);
        return Ok(());
    }

    let doc = tokenize(&text);
    println!(
        "{} {} ({} data lines, delimiter '{}')",
        "Parsed".bold(),
        file.display(),
        doc.records.len(),
        doc.delimiter as char
    );

    for (kind, report) in map_family(&text, family) {
        if report.dropped > 0 {
            output::warning(&format!(
                "{}: skipped {} row(s) without a valid year/month",
                kind.label(),
                report.dropped
            ));
        }
    }

    for payload in &payloads {
        println!();
        println!(
            "{}: actual {} / target {} ({})",
            payload.kind.label().bold(),
            format_value(payload.summary.actual),
            format_value(payload.summary.target),
            format_rate(payload.summary.achievement_rate_percent)
        );
        print_monthly(payload);
    }

    Ok(())
}
