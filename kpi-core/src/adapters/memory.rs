//! In-memory adapters
//!
//! `StaticSheetSource` serves fixed documents by URL and `MemoryEventStore`
//! keeps events in a Vec. Both back tests and the offline CLI paths.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::domain::result::{Error, Result};
use crate::domain::CalendarEvent;
use crate::ports::{EventStore, SheetSource};

/// Sheet source answering from a URL -> text map
#[derive(Debug, Default, Clone)]
pub struct StaticSheetSource {
    documents: HashMap<String, String>,
}

impl StaticSheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(url.into(), text.into());
        self
    }
}

impl SheetSource for StaticSheetSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(format!("No document for {}", url)))
    }
}

/// Event store held in memory
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<CalendarEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with events; missing ids are assigned
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let mut stored = Vec::with_capacity(events.len());
        for event in events {
            push_with_id(&mut stored, event);
        }
        Self {
            events: Mutex::new(stored),
        }
    }

    pub fn all(&self) -> Result<Vec<CalendarEvent>> {
        let events = self
            .events
            .lock()
            .map_err(|_| Error::store("event store lock poisoned"))?;
        Ok(events.clone())
    }
}

impl EventStore for MemoryEventStore {
    fn events_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let events = self
            .events
            .lock()
            .map_err(|_| Error::store("event store lock poisoned"))?;
        Ok(filter_between(&events, start, end))
    }

    fn replace_kind(&self, kind: &str, events: Vec<CalendarEvent>) -> Result<usize> {
        let mut stored = self
            .events
            .lock()
            .map_err(|_| Error::store("event store lock poisoned"))?;
        Ok(replace_kind_in(&mut stored, kind, events))
    }
}

pub(crate) fn filter_between(
    events: &[CalendarEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| event.date >= start && event.date <= end)
        .cloned()
        .collect()
}

/// Drop every event of `kind`, append `incoming` with fresh ids
pub(crate) fn replace_kind_in(
    stored: &mut Vec<CalendarEvent>,
    kind: &str,
    incoming: Vec<CalendarEvent>,
) -> usize {
    stored.retain(|event| event.kind != kind);
    let inserted = incoming.len();
    for event in incoming {
        push_with_id(stored, CalendarEvent { id: None, ..event });
    }
    inserted
}

fn push_with_id(stored: &mut Vec<CalendarEvent>, mut event: CalendarEvent) {
    if event.id.is_none() {
        let next = stored.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
        event.id = Some(next);
    }
    stored.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_static_source_serves_documents() {
        let source = StaticSheetSource::new().with_document("mem://a", "year,month\n");
        assert_eq!(source.fetch_text("mem://a").unwrap(), "year,month\n");
        assert!(source.fetch_text("mem://missing").is_err());
    }

    #[test]
    fn test_seeding_assigns_ids() {
        let store = MemoryEventStore::with_events(vec![
            CalendarEvent::new(date(2025, 5, 1), "a", "seminar", "osaka"),
            CalendarEvent::new(date(2025, 5, 2), "b", "seminar", "osaka").with_id(7),
            CalendarEvent::new(date(2025, 5, 3), "c", "seminar", "osaka"),
        ]);
        let ids: Vec<Option<i64>> = store.all().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(1), Some(7), Some(8)]);
    }

    #[test]
    fn test_events_between_is_inclusive() {
        let store = MemoryEventStore::with_events(vec![
            CalendarEvent::new(date(2025, 4, 30), "before", "seminar", "osaka"),
            CalendarEvent::new(date(2025, 5, 1), "start", "seminar", "osaka"),
            CalendarEvent::new(date(2025, 6, 30), "end", "seminar", "osaka"),
            CalendarEvent::new(date(2025, 7, 1), "after", "seminar", "osaka"),
        ]);
        let events = store.events_between(date(2025, 5, 1), date(2025, 6, 30)).unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["start", "end"]);
    }

    #[test]
    fn test_replace_kind_keeps_other_kinds() {
        let store = MemoryEventStore::with_events(vec![
            CalendarEvent::new(date(2025, 5, 1), "old fair", "jobfair", "tokyo"),
            CalendarEvent::new(date(2025, 5, 2), "seminar", "seminar", "osaka"),
        ]);
        let inserted = store
            .replace_kind(
                "jobfair",
                vec![CalendarEvent::new(date(2025, 5, 9), "new fair", "jobfair", "online").with_id(1)],
            )
            .unwrap();
        assert_eq!(inserted, 1);

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "seminar");
        assert_eq!(all[1].title, "new fair");
        assert_eq!(all[1].id, Some(3));
    }
}
