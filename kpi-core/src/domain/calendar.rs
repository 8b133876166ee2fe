//! Home calendar event model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Event type written by the sheet import; replaced wholesale on each import
pub const JOBFAIR_TYPE: &str = "jobfair";

/// A calendar entry, either persisted (has an id) or synthesized (no id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub line_keyword: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        kind: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            date,
            title: title.into(),
            kind: kind.into(),
            location: location.into(),
            description: None,
            apply_url: None,
            time: None,
            line_keyword: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Merge sort key; synthetic events (no id) rank as id 0
    pub fn sort_key(&self) -> (NaiveDate, i64) {
        (self.date, self.id.unwrap_or(0))
    }

    pub fn is_synthetic(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_portal_field_names() {
        let event = CalendarEvent::new(
            NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            "Job fair",
            JOBFAIR_TYPE,
            "tokyo",
        )
        .with_id(7);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2025-05-10");
        assert_eq!(json["type"], "jobfair");
        assert!(json.get("applyUrl").is_some());
        assert!(json.get("lineKeyword").is_some());
    }

    #[test]
    fn test_sort_key_treats_missing_id_as_zero() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let synthetic = CalendarEvent::new(date, "Meeting", "training", "osaka");
        assert!(synthetic.is_synthetic());
        assert_eq!(synthetic.sort_key(), (date, 0));
    }
}
