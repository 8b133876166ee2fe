//! Dashboard service - fetch, parse and present every KPI for a vertical
//!
//! Each request refetches from the sheet source. A family without a
//! configured URL or whose fetch fails renders as an empty series.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use super::presentation::{monthly_series, ChartPolicy, ChartWindow, MonthlySeries, Summary, SummaryPolicy};
use super::series::{BuiltSeries, SeriesBuilder, SeriesOrder};
use crate::config::Config;
use crate::domain::{nonzero, BusinessVertical, MetricFamily, MetricKind, MetricRow};
use crate::ingest::{map_family, MappingReport};
use crate::ports::SheetSource;

/// Compact-chart length for membership
const MEMBERSHIP_CHART_SIZE: usize = 5;

/// Everything rendered for one metric kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPayload {
    pub kind: MetricKind,
    pub summary: Summary,
    pub monthly_series: MonthlySeries,
    pub chart: ChartWindow,
}

/// Full dashboard for one business vertical
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub business: BusinessVertical,
    pub membership: MetricPayload,
    pub partner: MetricPayload,
    pub event_sales: MetricPayload,
    pub total_sales: MetricPayload,
}

impl DashboardPayload {
    pub fn metrics(&self) -> [&MetricPayload; 4] {
        [
            &self.membership,
            &self.partner,
            &self.event_sales,
            &self.total_sales,
        ]
    }
}

/// Chart policy used for a kind's compact chart
pub fn chart_policy(kind: MetricKind) -> ChartPolicy {
    match kind {
        MetricKind::Membership => ChartPolicy::Prefix(MEMBERSHIP_CHART_SIZE),
        MetricKind::Partner => ChartPolicy::ThroughLastObserved,
        MetricKind::EventSales | MetricKind::TotalSales => ChartPolicy::Full,
    }
}

/// Summary policy used for a kind's headline card
pub fn summary_policy(kind: MetricKind) -> SummaryPolicy {
    match kind {
        MetricKind::TotalSales => SummaryPolicy::RunningTotal,
        _ => SummaryPolicy::LatestObserved,
    }
}

/// Build the rendered payload for an already-built series
pub fn build_payload(kind: MetricKind, built: &BuiltSeries) -> MetricPayload {
    MetricPayload {
        kind,
        summary: summary_policy(kind).apply(built),
        monthly_series: monthly_series(built),
        chart: chart_policy(kind).apply(built),
    }
}

/// Fill absent or zero total-sales values from the event-sales row at the same index
///
/// Actuals and monthly targets fall back row by row. Annual targets fall back
/// per year: the event value is used only for years where no total-sales row
/// declares an annual target of its own.
pub fn with_event_fallback(total: &[MetricRow], event: &[MetricRow]) -> Vec<MetricRow> {
    let years_with_annual: BTreeSet<i32> = total
        .iter()
        .filter(|row| nonzero(row.annual_target).is_some())
        .map(|row| row.year)
        .collect();

    total
        .iter()
        .enumerate()
        .map(|(idx, row)| match event.get(idx) {
            Some(source) => MetricRow {
                actual: nonzero(row.actual).or(source.actual),
                target: nonzero(row.target).or(source.target),
                annual_target: if years_with_annual.contains(&row.year) {
                    row.annual_target
                } else {
                    source.annual_target
                },
                ..row.clone()
            },
            None => row.clone(),
        })
        .collect()
}

/// Parse a family document and build a payload for each of its kinds
pub fn payloads_from_text(
    text: &str,
    family: MetricFamily,
    builder: &SeriesBuilder,
) -> Vec<MetricPayload> {
    let mapped = map_family(text, family);
    let event_rows = mapped
        .iter()
        .find(|(kind, _)| *kind == MetricKind::EventSales)
        .map(|(_, report)| report.rows.clone());

    mapped
        .into_iter()
        .map(|(kind, MappingReport { rows, dropped })| {
            if dropped > 0 {
                info!(kind = kind.label(), dropped, "skipped rows without a valid period");
            }
            let rows = match (kind, &event_rows) {
                (MetricKind::TotalSales, Some(event)) => with_event_fallback(&rows, event),
                _ => rows,
            };
            build_payload(kind, &builder.build(&rows))
        })
        .collect()
}

/// Service for computing dashboards from configured sheet sources
pub struct DashboardService<S: SheetSource> {
    source: S,
    config: Config,
    builder: SeriesBuilder,
}

impl<S: SheetSource> DashboardService<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self {
            source,
            config,
            builder: SeriesBuilder::new(),
        }
    }

    pub fn with_order(mut self, order: SeriesOrder) -> Self {
        self.builder = self.builder.with_order(order);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw document text for a family; empty when unconfigured or unreachable
    pub fn load_family(&self, family: MetricFamily, vertical: BusinessVertical) -> String {
        let Some(url) = self.config.source_url(family, vertical) else {
            info!(
                family = family.as_str(),
                vertical = vertical.as_str(),
                "no source configured"
            );
            return String::new();
        };

        match self.source.fetch_text(url) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    family = family.as_str(),
                    vertical = vertical.as_str(),
                    source = self.source.name(),
                    error = %e,
                    "fetch failed, rendering empty series"
                );
                String::new()
            }
        }
    }

    /// Payloads for every kind of one family
    pub fn family_payloads(
        &self,
        family: MetricFamily,
        vertical: BusinessVertical,
    ) -> Vec<MetricPayload> {
        let text = self.load_family(family, vertical);
        payloads_from_text(&text, family, &self.builder)
    }

    /// Payload for a single kind
    pub fn metric(&self, kind: MetricKind, vertical: BusinessVertical) -> MetricPayload {
        self.family_payloads(kind.family(), vertical)
            .into_iter()
            .find(|payload| payload.kind == kind)
            .unwrap_or_else(|| build_payload(kind, &BuiltSeries::default()))
    }

    /// All metrics for a vertical; the three families are fetched in parallel
    pub fn dashboard(&self, vertical: BusinessVertical) -> DashboardPayload {
        let (membership, partner, sales) = std::thread::scope(|scope| {
            let membership =
                scope.spawn(|| self.family_payloads(MetricFamily::Membership, vertical));
            let partner = scope.spawn(|| self.family_payloads(MetricFamily::Partner, vertical));
            let sales = self.family_payloads(MetricFamily::Sales, vertical);
            (join_or_empty(membership), join_or_empty(partner), sales)
        });

        let mut payloads = membership.into_iter().chain(partner).chain(sales);
        let mut take = |kind: MetricKind| {
            payloads
                .find(|payload| payload.kind == kind)
                .unwrap_or_else(|| build_payload(kind, &BuiltSeries::default()))
        };

        DashboardPayload {
            business: vertical,
            membership: take(MetricKind::Membership),
            partner: take(MetricKind::Partner),
            event_sales: take(MetricKind::EventSales),
            total_sales: take(MetricKind::TotalSales),
        }
    }
}

fn join_or_empty(handle: std::thread::ScopedJoinHandle<'_, Vec<MetricPayload>>) -> Vec<MetricPayload> {
    handle.join().unwrap_or_else(|_| {
        warn!("family worker panicked, rendering empty series");
        Vec::new()
    })
}
