//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod calendar;
pub mod dashboard;
pub mod presentation;
pub mod series;

pub use calendar::{
    build_description, default_window, event_from_sheet_row, merge_events, normalize_location,
    synthesize_occurrences, CalendarService, DateWindow, ImportSummary, RecurringRule,
};
pub use dashboard::{
    build_payload, payloads_from_text, with_event_fallback, DashboardPayload, DashboardService,
    MetricPayload,
};
pub use presentation::{
    chart_window, monthly_series, running_total_summary, summary_card, through_last_observed,
    ChartPolicy, ChartWindow, MonthlySeries, Summary, SummaryPolicy,
};
pub use series::{
    achievement_rate, build_series, latest_observed, BuiltSeries, DerivedSeries, SeriesBuilder,
    SeriesOrder,
};
