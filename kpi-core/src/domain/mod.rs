//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with no I/O or external dependencies.

mod calendar;
mod metric;
pub mod result;

pub use calendar::{CalendarEvent, JOBFAIR_TYPE};
pub use metric::{nonzero, BusinessVertical, MetricFamily, MetricKind, MetricRow};
