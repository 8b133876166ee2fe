//! Presentation adapter: summary cards and chart payloads
//!
//! Everything here reads a `BuiltSeries` and returns plain numbers. Missing
//! values collapse to `0` at this layer and nowhere earlier.

use serde::{Deserialize, Serialize};

use super::series::{achievement_rate, BuiltSeries};
use crate::domain::nonzero;

/// Headline numbers for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub actual: f64,
    pub target: f64,
    pub achievement_rate_percent: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub actuals: Vec<f64>,
    pub targets: Vec<f64>,
    pub monthly_rates: Vec<i64>,
    pub cumulative_rates: Vec<i64>,
}

/// Slice of a series for a compact chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartWindow {
    pub labels: Vec<String>,
    pub actuals: Vec<f64>,
    pub cumulative_rates: Vec<i64>,
}

impl ChartWindow {
    pub fn len(&self) -> usize {
        self.actuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actuals.is_empty()
    }
}

/// Which entries a chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartPolicy {
    Prefix(usize),
    ThroughLastObserved,
    Full,
}

impl ChartPolicy {
    pub fn apply(self, built: &BuiltSeries) -> ChartWindow {
        match self {
            ChartPolicy::Prefix(size) => chart_window(built, size),
            ChartPolicy::ThroughLastObserved => through_last_observed(built),
            ChartPolicy::Full => chart_window(built, built.len()),
        }
    }
}

/// How the headline actual is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryPolicy {
    #[default]
    LatestObserved,
    RunningTotal,
}

impl SummaryPolicy {
    pub fn apply(self, built: &BuiltSeries) -> Summary {
        match self {
            SummaryPolicy::LatestObserved => summary_card(built),
            SummaryPolicy::RunningTotal => running_total_summary(built),
        }
    }
}

/// Summary from the latest-nonzero row
///
/// actual: its cumulative actual if non-zero, else its actual.
/// target: annual target of its year, else its own target.
pub fn summary_card(built: &BuiltSeries) -> Summary {
    let Some(latest) = built.latest_observed() else {
        return Summary::default();
    };

    let actual = nonzero(latest.cumulative_actual)
        .or(latest.actual)
        .unwrap_or(0.0);
    let target = summary_target(built);
    summarize(actual, target)
}

/// Total-sales card: every row's actual summed, target as in `summary_card`
pub fn running_total_summary(built: &BuiltSeries) -> Summary {
    let actual: f64 = built.rows.iter().filter_map(|row| row.actual).sum();
    summarize(actual, summary_target(built))
}

fn summary_target(built: &BuiltSeries) -> f64 {
    built
        .latest_observed()
        .and_then(|latest| nonzero(built.effective_target_for(latest)))
        .unwrap_or(0.0)
}

fn summarize(actual: f64, target: f64) -> Summary {
    let actual = finite_or_zero(actual);
    let target = finite_or_zero(target);
    Summary {
        actual,
        target,
        achievement_rate_percent: achievement_rate(Some(actual), Some(target)),
    }
}

pub fn monthly_series(built: &BuiltSeries) -> MonthlySeries {
    MonthlySeries {
        labels: built.rows.iter().map(|row| row.label()).collect(),
        actuals: built.rows.iter().map(|row| or_zero(row.actual)).collect(),
        targets: built.rows.iter().map(|row| or_zero(row.target)).collect(),
        monthly_rates: built.derived.monthly_achievement_rate.clone(),
        cumulative_rates: built.derived.cumulative_achievement_rate.clone(),
    }
}

/// First `size` entries (fewer when the series is shorter)
pub fn chart_window(built: &BuiltSeries, size: usize) -> ChartWindow {
    let size = size.min(built.len());
    let rows = &built.rows[..size];
    ChartWindow {
        labels: rows.iter().map(|row| row.label()).collect(),
        actuals: rows.iter().map(|row| or_zero(row.actual)).collect(),
        cumulative_rates: built.derived.cumulative_achievement_rate[..size].to_vec(),
    }
}

/// Entries up to and including the last non-zero actual; empty when none
pub fn through_last_observed(built: &BuiltSeries) -> ChartWindow {
    let end = built
        .rows
        .iter()
        .rposition(|row| nonzero(row.actual).is_some())
        .map_or(0, |idx| idx + 1);
    chart_window(built, end)
}

fn or_zero(value: Option<f64>) -> f64 {
    value.map_or(0.0, finite_or_zero)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
