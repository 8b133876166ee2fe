//! Event store port - persisted calendar events

use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::CalendarEvent;

/// Storage for calendar events
///
/// Stored events always carry an id; implementations assign one on insert.
pub trait EventStore: Send + Sync {
    /// Events whose date falls in `[start, end]`, in storage order
    fn events_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>>;

    /// Replace every event of `kind` with `events`, keeping other kinds
    ///
    /// Returns the number of events inserted.
    fn replace_kind(&self, kind: &str, events: Vec<CalendarEvent>) -> Result<usize>;
}
