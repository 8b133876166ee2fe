//! Dashboard command - fetch all sources and print KPI cards

use anyhow::Result;
use colored::Colorize;

use kpi_core::services::MetricPayload;
use kpi_core::BusinessVertical;

use super::{get_context, series_order};
use crate::output::{self, format_rate, format_value};

/// Vertical for a `--business` value, plus a warning when it was not recognised
fn resolve_vertical(business: &str) -> (BusinessVertical, Option<String>) {
    let vertical = BusinessVertical::from_query(Some(business));
    let warning = (vertical.as_str() != business.trim())
        .then(|| format!("Unknown business '{}', showing career", business));
    (vertical, warning)
}

pub fn run(business: &str, chronological: bool, json: bool) -> Result<()> {
    let (vertical, warning) = resolve_vertical(business);
    if let (Some(msg), false) = (warning, json) {
        output::warning(&msg);
    }

    let ctx = get_context()?;
    let service = ctx
        .dashboard_service
        .with_order(series_order(chronological));
    let dashboard = service.dashboard(vertical);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("{} {}", "KPI Dashboard".bold(), format!("({})", vertical).dimmed());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Metric", "Actual", "Target", "Achievement"]);
    for metric in dashboard.metrics() {
        table.add_row(vec![
            metric.kind.label().to_string(),
            format_value(metric.summary.actual),
            format_value(metric.summary.target),
            format_rate(metric.summary.achievement_rate_percent),
        ]);
    }
    println!("{}", table);

    for metric in dashboard.metrics() {
        print_monthly(metric);
    }

    Ok(())
}

/// Month-by-month table for one metric
pub fn print_monthly(metric: &MetricPayload) {
    println!();
    println!("{}", metric.kind.label().bold());

    let series = &metric.monthly_series;
    if series.labels.is_empty() {
        println!("  {}", "no data".dimmed());
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["Month", "Actual", "Target", "Monthly", "Cumulative"]);
    for idx in 0..series.labels.len() {
        table.add_row(vec![
            series.labels[idx].clone(),
            format_value(series.actuals[idx]),
            format_value(series.targets[idx]),
            format!("{}%", series.monthly_rates[idx]),
            format!("{}%", series.cumulative_rates[idx]),
        ]);
    }
    println!("{}", table);
}
