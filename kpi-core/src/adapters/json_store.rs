//! JSON file event store
//!
//! File layout: `{"events": [ ... ]}` with the same camelCase fields the
//! calendar endpoint serves. A missing file reads as an empty store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::memory::{filter_between, replace_kind_in};
use crate::domain::result::{Error, Result};
use crate::domain::CalendarEvent;
use crate::ports::EventStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct EventsFile {
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

/// Event store persisted as a single JSON document
pub struct JsonEventStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<EventsFile> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "events file missing, starting empty");
            return Ok(EventsFile::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(EventsFile::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::store(format!(
                "Events file {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write(&self, file: &EventsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl EventStore for JsonEventStore {
    fn events_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let file = self.read()?;
        Ok(filter_between(&file.events, start, end))
    }

    fn replace_kind(&self, kind: &str, events: Vec<CalendarEvent>) -> Result<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::store("events file lock poisoned"))?;

        let mut file = self.read()?;
        let before = file.events.len();
        let inserted = replace_kind_in(&mut file.events, kind, events);
        self.write(&file)?;

        info!(
            kind,
            inserted,
            removed = before + inserted - file.events.len(),
            path = %self.path.display(),
            "replaced events"
        );
        Ok(inserted)
    }
}
