//! Calendar commands - upcoming events and event-sheet import

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde::Serialize;

use kpi_core::services::default_window;
use kpi_core::CalendarEvent;

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct EventsResponse<'a> {
    events: &'a [CalendarEvent],
}

pub fn run(today: Option<&str>, json: bool) -> Result<()> {
    let today = match today {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?,
        None => Local::now().date_naive(),
    };

    let ctx = get_context()?;
    let events = ctx.calendar_service.upcoming(today)?;

    if json {
        let response = EventsResponse { events: &events };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let window = default_window(today);
    println!(
        "{} {} to {}",
        "Calendar".bold(),
        window.start,
        window.end
    );
    println!();

    if events.is_empty() {
        println!("No events.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Time", "Title", "Type", "Location"]);
    for event in &events {
        let title = if event.is_synthetic() {
            event.title.dimmed().to_string()
        } else {
            event.title.clone()
        };
        table.add_row(vec![
            event.date.format("%Y-%m-%d (%a)").to_string(),
            event.time.clone().unwrap_or_default(),
            title,
            event.kind.clone(),
            event.location.clone(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

pub fn run_import(file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let ctx = get_context()?;
    let summary = ctx
        .calendar_service
        .import_sheet(&text)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::success(&format!("Imported {} job-fair event(s)", summary.imported));
    if summary.skipped > 0 {
        output::warning(&format!(
            "Skipped {} row(s) missing a title or a valid date",
            summary.skipped
        ));
    }

    Ok(())
}
