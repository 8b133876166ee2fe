//! Series builder - achievement rates, cumulative totals, annual targets
//!
//! Rows are consumed in the order given. Spreadsheets are maintained in
//! chronological order, and "latest" and "cumulative" values depend on that;
//! `SeriesOrder::Chronological` sorts first for sources that are not.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{nonzero, MetricRow};

/// How rows are ordered before accumulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesOrder {
    /// Keep spreadsheet order
    #[default]
    AsGiven,
    /// Stable sort by (year, month) first
    Chronological,
}

/// Values computed per row, index-aligned with `BuiltSeries::rows`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSeries {
    pub monthly_achievement_rate: Vec<i64>,
    pub cumulative_actual: Vec<f64>,
    pub cumulative_achievement_rate: Vec<i64>,
    /// Target the cumulative rate was measured against
    pub effective_target: Vec<Option<f64>>,
}

/// A metric series with its derived values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltSeries {
    pub rows: Vec<MetricRow>,
    /// First non-zero annual target per year (`None` when the year declares none)
    pub annual_targets: BTreeMap<i32, Option<f64>>,
    pub derived: DerivedSeries,
}

impl BuiltSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn annual_target_for(&self, year: i32) -> Option<f64> {
        self.annual_targets.get(&year).copied().flatten()
    }

    /// Annual target of the row's year, falling back to the row's own target
    pub fn effective_target_for(&self, row: &MetricRow) -> Option<f64> {
        self.annual_target_for(row.year).or(row.target)
    }

    pub fn latest_observed(&self) -> Option<&MetricRow> {
        latest_observed(&self.rows)
    }
}

/// Builds `BuiltSeries` from mapped rows
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesBuilder {
    order: SeriesOrder,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: SeriesOrder) -> Self {
        self.order = order;
        self
    }

    pub fn build(&self, rows: &[MetricRow]) -> BuiltSeries {
        let mut rows = rows.to_vec();
        if self.order == SeriesOrder::Chronological {
            rows.sort_by_key(|row| (row.year, row.month));
        }

        let annual_targets = resolve_annual_targets(&rows);
        let cumulative_actual = cumulative_actuals(&rows);

        let effective_target: Vec<Option<f64>> = rows
            .iter()
            .map(|row| annual_targets.get(&row.year).copied().flatten().or(row.target))
            .collect();

        let monthly_achievement_rate = rows
            .iter()
            .map(|row| achievement_rate(row.actual, row.target))
            .collect();

        let cumulative_achievement_rate = cumulative_actual
            .iter()
            .zip(&effective_target)
            .map(|(cumulative, target)| achievement_rate(Some(*cumulative), *target))
            .collect();

        debug!(
            rows = rows.len(),
            years = annual_targets.len(),
            order = ?self.order,
            "built series"
        );

        BuiltSeries {
            rows,
            annual_targets,
            derived: DerivedSeries {
                monthly_achievement_rate,
                cumulative_actual,
                cumulative_achievement_rate,
                effective_target,
            },
        }
    }
}

/// Build with spreadsheet order preserved
pub fn build_series(rows: &[MetricRow]) -> BuiltSeries {
    SeriesBuilder::new().build(rows)
}

/// First non-null, non-zero annual target for every year present
pub fn resolve_annual_targets(rows: &[MetricRow]) -> BTreeMap<i32, Option<f64>> {
    let mut targets: BTreeMap<i32, Option<f64>> = BTreeMap::new();
    for row in rows {
        let slot = targets.entry(row.year).or_insert(None);
        if slot.is_none() {
            *slot = nonzero(row.annual_target);
        }
    }
    targets
}

/// Most recent row with a real observation, else the last row
///
/// Only an empty series yields `None`.
pub fn latest_observed(rows: &[MetricRow]) -> Option<&MetricRow> {
    rows.iter()
        .rev()
        .find(|row| row.has_observation())
        .or_else(|| rows.last())
}

/// Running sum of `actual`; a row's own non-zero `cumulative_actual`
/// replaces the sum at that index and becomes the new base
pub fn cumulative_actuals(rows: &[MetricRow]) -> Vec<f64> {
    let mut running = 0.0;
    rows.iter()
        .map(|row| {
            match nonzero(row.cumulative_actual) {
                Some(authoritative) => running = authoritative,
                None => running += row.actual.unwrap_or(0.0),
            }
            running
        })
        .collect()
}

/// `round(actual / target * 100)`, or 0 when either side is missing or zero
pub fn achievement_rate(actual: Option<f64>, target: Option<f64>) -> i64 {
    match (nonzero(actual), nonzero(target)) {
        (Some(actual), Some(target)) => round_half_up(actual / target * 100.0),
        _ => 0,
    }
}

/// Half-up rounding (2.5 -> 3, -2.5 -> -2); non-finite input gives 0
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_target_propagates_within_year() {
        let rows = vec![
            MetricRow::new(2025, 1).with_target(100.0).with_annual_target(1200.0),
            MetricRow::new(2025, 2).with_target(100.0),
        ];
        let built = build_series(&rows);

        assert_eq!(built.annual_target_for(2025), Some(1200.0));
        assert_eq!(built.effective_target_for(&built.rows[1]), Some(1200.0));
        assert_eq!(built.derived.effective_target, vec![Some(1200.0), Some(1200.0)]);
    }

    #[test]
    fn test_annual_target_skips_zero_and_is_per_year() {
        let rows = vec![
            MetricRow::new(2024, 12).with_annual_target(0.0).with_target(10.0),
            MetricRow::new(2024, 11).with_annual_target(900.0),
            MetricRow::new(2025, 1).with_target(50.0),
        ];
        let targets = resolve_annual_targets(&rows);
        assert_eq!(targets.get(&2024), Some(&Some(900.0)));
        assert_eq!(targets.get(&2025), Some(&None));

        let built = build_series(&rows);
        assert_eq!(built.effective_target_for(&built.rows[2]), Some(50.0));
    }

    #[test]
    fn test_cumulative_override_becomes_new_base() {
        let rows = vec![
            MetricRow::new(2025, 1).with_actual(10.0),
            MetricRow::new(2025, 2).with_actual(20.0).with_cumulative_actual(500.0),
            MetricRow::new(2025, 3).with_actual(5.0),
        ];
        assert_eq!(cumulative_actuals(&rows), vec![10.0, 500.0, 505.0]);
    }

    #[test]
    fn test_zero_cumulative_does_not_override() {
        let rows = vec![
            MetricRow::new(2025, 1).with_actual(10.0),
            MetricRow::new(2025, 2).with_actual(20.0).with_cumulative_actual(0.0),
        ];
        assert_eq!(cumulative_actuals(&rows), vec![10.0, 30.0]);
    }

    #[test]
    fn test_latest_observed_skips_trailing_zero() {
        let rows = vec![
            MetricRow::new(2025, 1).with_actual(50.0),
            MetricRow::new(2025, 2).with_actual(0.0),
            MetricRow::new(2025, 3),
        ];
        assert_eq!(latest_observed(&rows).unwrap().month, 1);
    }

    #[test]
    fn test_latest_observed_falls_back_to_last_row() {
        let rows = vec![
            MetricRow::new(2025, 1).with_actual(0.0),
            MetricRow::new(2025, 2).with_actual(0.0),
        ];
        assert_eq!(latest_observed(&rows).unwrap().month, 2);
        assert!(latest_observed(&[]).is_none());
    }

    #[test]
    fn test_monthly_rate_is_zero_without_both_operands() {
        assert_eq!(achievement_rate(Some(15.0), Some(20.0)), 75);
        assert_eq!(achievement_rate(None, Some(20.0)), 0);
        assert_eq!(achievement_rate(Some(0.0), Some(20.0)), 0);
        assert_eq!(achievement_rate(Some(15.0), Some(0.0)), 0);
        assert_eq!(achievement_rate(Some(15.0), None), 0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(4.1666), 4);
        assert_eq!(round_half_up(10.4166), 10);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(f64::INFINITY), 0);
    }

    #[test]
    fn test_end_to_end_rates() {
        let rows = vec![
            MetricRow::new(2025, 4)
                .with_actual(10.0)
                .with_target(20.0)
                .with_annual_target(240.0),
            MetricRow::new(2025, 5).with_actual(15.0).with_target(20.0),
        ];
        let built = build_series(&rows);
        assert_eq!(built.derived.monthly_achievement_rate, vec![50, 75]);
        assert_eq!(built.derived.cumulative_actual, vec![10.0, 25.0]);
        assert_eq!(built.derived.cumulative_achievement_rate, vec![4, 10]);
    }

    #[test]
    fn test_as_given_order_is_not_resorted() {
        let rows = vec![
            MetricRow::new(2025, 3).with_actual(1.0),
            MetricRow::new(2025, 1).with_actual(2.0),
        ];
        let built = build_series(&rows);
        assert_eq!(built.rows[0].month, 3);
        assert_eq!(built.derived.cumulative_actual, vec![1.0, 3.0]);
    }

    #[test]
    fn test_chronological_order_sorts_stably() {
        let rows = vec![
            MetricRow::new(2025, 3).with_actual(1.0),
            MetricRow::new(2025, 1).with_actual(2.0),
            MetricRow::new(2025, 1).with_actual(3.0),
        ];
        let built = SeriesBuilder::new()
            .with_order(SeriesOrder::Chronological)
            .build(&rows);
        let months: Vec<u32> = built.rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![1, 1, 3]);
        assert_eq!(built.rows[0].actual, Some(2.0));
        assert_eq!(built.derived.cumulative_actual, vec![2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_empty_series() {
        let built = build_series(&[]);
        assert!(built.is_empty());
        assert!(built.derived.cumulative_actual.is_empty());
        assert!(built.latest_observed().is_none());
    }
}
