//! Home calendar: recurring-event synthesis, merge, and sheet import
//!
//! Synthesis and merge are separate pure steps. `CalendarService` wires them
//! to an `EventStore`.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{CalendarEvent, JOBFAIR_TYPE};
use crate::ports::EventStore;

/// Template for an event repeating on one weekday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringRule {
    pub weekday: Weekday,
    pub title: String,
    pub description: Option<String>,
    pub time: Option<String>,
    pub kind: String,
    pub location: String,
}

impl Default for RecurringRule {
    /// Weekly student meetup, every Saturday afternoon in Osaka
    fn default() -> Self {
        Self {
            weekday: Weekday::Sat,
            title: "学生定期集会".to_string(),
            description: Some(
                "週に一回集合する定期集会です。\n基本的には参加必須です。".to_string(),
            ),
            time: Some("15:00〜18:00".to_string()),
            kind: "training".to_string(),
            location: "osaka".to_string(),
        }
    }
}

impl RecurringRule {
    fn occurrence(&self, date: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            description: self.description.clone(),
            time: self.time.clone(),
            ..CalendarEvent::new(date, &self.title, &self.kind, &self.location)
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First day of `today`'s month through the last day of the next month
    pub fn current_and_next_month(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = start
            .checked_add_months(Months::new(2))
            .and_then(|first_after| first_after.pred_opt())
            .unwrap_or(start);
        Self { start, end }
    }

    /// Every date in the window; empty when `end < start`
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take_while(move |day| *day <= self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Default calendar window for a given day
pub fn default_window(today: NaiveDate) -> DateWindow {
    DateWindow::current_and_next_month(today)
}

/// One event per date in the window whose weekday matches the rule
pub fn synthesize_occurrences(window: &DateWindow, rule: &RecurringRule) -> Vec<CalendarEvent> {
    window
        .days()
        .filter(|day| day.weekday() == rule.weekday)
        .map(|day| rule.occurrence(day))
        .collect()
}

/// Persisted first, then synthetic, stable-sorted by `(date, id or 0)`
///
/// Synthetic events sort ahead of persisted events on the same date.
pub fn merge_events(
    persisted: Vec<CalendarEvent>,
    synthetic: Vec<CalendarEvent>,
) -> Vec<CalendarEvent> {
    let mut merged = persisted;
    merged.extend(synthetic);
    merged.sort_by_key(CalendarEvent::sort_key);
    merged
}

/// Map a free-text venue to a location code
pub fn normalize_location(place: &str) -> &'static str {
    let place = place.trim();
    if place.is_empty() {
        "other"
    } else if place.contains("オン") || place.to_lowercase().contains("online") {
        "online"
    } else if place.contains("大阪") {
        "osaka"
    } else if place.contains("東京") {
        "tokyo"
    } else {
        "other"
    }
}

// Event sheet column positions (A = 0)
const COL_TITLE: usize = 2;
const COL_DATE: usize = 3;
const COL_PLACE: usize = 4;
const COL_INDUSTRIES: usize = 7;
const COL_EXPERIENCES: usize = 8;
const COL_CONCEPT: usize = 9;
const COL_COMPANY_COUNT: usize = 10;
const COL_CAPACITY: usize = 11;
const COL_TARGET_STUDENTS: usize = 12;
const COL_APPLY_URL: usize = 13;
const COL_TIME: usize = 14;
const COL_LINE_KEYWORD: usize = 15;

fn sheet_cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|c| c.trim()).unwrap_or("")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Assemble the job-fair description from the sheet's detail columns
pub fn build_description(cells: &[String]) -> String {
    let industries = sheet_cell(cells, COL_INDUSTRIES);
    let experiences = sheet_cell(cells, COL_EXPERIENCES);
    let concept = sheet_cell(cells, COL_CONCEPT);
    let company_count = sheet_cell(cells, COL_COMPANY_COUNT);
    let capacity = sheet_cell(cells, COL_CAPACITY);
    let target_students = sheet_cell(cells, COL_TARGET_STUDENTS);

    let mut parts = Vec::new();
    if !concept.is_empty() {
        parts.push(format!("【コンセプト】\n{}", concept));
    }
    if !experiences.is_empty() {
        parts.push(format!("【得られる経験】\n{}", experiences));
    }
    if !industries.is_empty() {
        parts.push(format!("【業界】\n{}", industries));
    }

    let scale = match (company_count.is_empty(), capacity.is_empty()) {
        (false, false) => Some(format!("{}社 / {}名", company_count, capacity)),
        (false, true) => Some(format!("{}社", company_count)),
        (true, false) => Some(format!("{}名", capacity)),
        (true, true) => None,
    };
    if let Some(scale) = scale {
        parts.push(format!("【参加企業数・定員】\n{}", scale));
    }

    if !target_students.is_empty() {
        parts.push(format!("【おすすめの学生像】\n{}", target_students));
    }

    parts.join("\n\n")
}

fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Convert one event-sheet data row into a job-fair event
///
/// `None` when the title or date is missing or the date is unreadable.
pub fn event_from_sheet_row(cells: &[String]) -> Option<CalendarEvent> {
    let title = sheet_cell(cells, COL_TITLE);
    let raw_date = sheet_cell(cells, COL_DATE);
    if title.is_empty() || raw_date.is_empty() {
        return None;
    }
    let date = parse_sheet_date(raw_date)?;

    let description = build_description(cells);
    Some(CalendarEvent {
        description: non_empty(&description),
        apply_url: non_empty(sheet_cell(cells, COL_APPLY_URL)),
        time: non_empty(sheet_cell(cells, COL_TIME)),
        line_keyword: non_empty(sheet_cell(cells, COL_LINE_KEYWORD)),
        ..CalendarEvent::new(
            date,
            title,
            JOBFAIR_TYPE,
            normalize_location(sheet_cell(cells, COL_PLACE)),
        )
    })
}

/// Read an event-sheet CSV export into raw rows (header included)
///
/// Detail columns are multi-line prose, so quoting is honoured here.
pub fn read_sheet_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Outcome of a sheet import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Upcoming events and event-sheet import over an `EventStore`
pub struct CalendarService<E: EventStore> {
    store: E,
    rule: RecurringRule,
}

impl<E: EventStore> CalendarService<E> {
    pub fn new(store: E) -> Self {
        Self {
            store,
            rule: RecurringRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: RecurringRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn store(&self) -> &E {
        &self.store
    }

    /// Persisted plus synthesized events for the default window around `today`
    pub fn upcoming(&self, today: NaiveDate) -> Result<Vec<CalendarEvent>> {
        self.events_in(&default_window(today))
    }

    pub fn events_in(&self, window: &DateWindow) -> Result<Vec<CalendarEvent>> {
        let persisted = self.store.events_between(window.start, window.end)?;
        let synthetic = synthesize_occurrences(window, &self.rule);
        debug!(
            start = %window.start,
            end = %window.end,
            persisted = persisted.len(),
            synthetic = synthetic.len(),
            "merging calendar events"
        );
        Ok(merge_events(persisted, synthetic))
    }

    /// Replace all job-fair events with the rows of an event-sheet export
    ///
    /// The first row is the header. Other event types stay untouched.
    pub fn import_sheet(&self, text: &str) -> Result<ImportSummary> {
        let rows = read_sheet_rows(text)?;
        if rows.len() <= 1 {
            return Err(Error::validation("Event sheet has no data rows"));
        }

        let data_rows = &rows[1..];
        let events: Vec<CalendarEvent> = data_rows
            .iter()
            .filter_map(|cells| event_from_sheet_row(cells))
            .collect();
        let skipped = data_rows.len() - events.len();

        let imported = self.store.replace_kind(JOBFAIR_TYPE, events)?;
        info!(imported, skipped, "imported event sheet");

        Ok(ImportSummary { imported, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryEventStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_default_window_spans_two_months() {
        let window = default_window(date(2025, 5, 17));
        assert_eq!(window.start, date(2025, 5, 1));
        assert_eq!(window.end, date(2025, 6, 30));

        let december = default_window(date(2025, 12, 31));
        assert_eq!(december.start, date(2025, 12, 1));
        assert_eq!(december.end, date(2026, 1, 31));

        let leap = default_window(date(2024, 1, 10));
        assert_eq!(leap.end, date(2024, 2, 29));
    }

    #[test]
    fn test_each_saturday_synthesized_once() {
        let window = DateWindow::new(date(2025, 5, 1), date(2025, 6, 30));
        let events = synthesize_occurrences(&window, &RecurringRule::default());

        let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 5, 3),
                date(2025, 5, 10),
                date(2025, 5, 17),
                date(2025, 5, 24),
                date(2025, 5, 31),
                date(2025, 6, 7),
                date(2025, 6, 14),
                date(2025, 6, 21),
                date(2025, 6, 28),
            ]
        );
        assert!(events.iter().all(|e| e.is_synthetic()));
        assert_eq!(events[0].title, "学生定期集会");
        assert_eq!(events[0].kind, "training");
        assert_eq!(events[0].time.as_deref(), Some("15:00〜18:00"));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = DateWindow::new(date(2025, 5, 3), date(2025, 5, 10));
        assert_eq!(synthesize_occurrences(&window, &RecurringRule::default()).len(), 2);

        let inverted = DateWindow::new(date(2025, 5, 10), date(2025, 5, 3));
        assert!(synthesize_occurrences(&inverted, &RecurringRule::default()).is_empty());
    }

    #[test]
    fn test_synthetic_sorts_before_persisted_on_same_date() {
        let persisted = vec![
            CalendarEvent::new(date(2025, 5, 10), "fair", JOBFAIR_TYPE, "tokyo").with_id(12),
            CalendarEvent::new(date(2025, 5, 2), "seminar", "seminar", "osaka").with_id(3),
        ];
        let synthetic = vec![CalendarEvent::new(date(2025, 5, 10), "meetup", "training", "osaka")];

        let merged = merge_events(persisted, synthetic);
        let titles: Vec<&str> = merged.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["seminar", "meetup", "fair"]);
    }

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location("オンライン"), "online");
        assert_eq!(normalize_location("Zoom (Online)"), "online");
        assert_eq!(normalize_location("大阪本社"), "osaka");
        assert_eq!(normalize_location("東京都渋谷区"), "tokyo");
        assert_eq!(normalize_location("名古屋"), "other");
        assert_eq!(normalize_location("  "), "other");
    }

    #[test]
    fn test_build_description_sections() {
        let cells = row(&[
            "", "", "Fair", "2025-05-10", "東京", "", "", "IT", "面接練習", "少人数", "5", "30",
            "挑戦したい学生",
        ]);
        assert_eq!(
            build_description(&cells),
            "【コンセプト】\n少人数\n\n【得られる経験】\n面接練習\n\n【業界】\nIT\n\n\
             【参加企業数・定員】\n5社 / 30名\n\n【おすすめの学生像】\n挑戦したい学生"
        );

        let only_capacity = row(&["", "", "", "", "", "", "", "", "", "", "", "20"]);
        assert_eq!(build_description(&only_capacity), "【参加企業数・定員】\n20名");
        assert_eq!(build_description(&row(&["a"])), "");
    }

    #[test]
    fn test_event_from_sheet_row() {
        let cells = row(&[
            "x", "y", " Career Fair ", "2025/05/10", "オンライン", "", "", "", "", "", "", "",
            "", "https://apply", "13:00", "fair2025",
        ]);
        let event = event_from_sheet_row(&cells).unwrap();
        assert_eq!(event.title, "Career Fair");
        assert_eq!(event.date, date(2025, 5, 10));
        assert_eq!(event.kind, JOBFAIR_TYPE);
        assert_eq!(event.location, "online");
        assert_eq!(event.apply_url.as_deref(), Some("https://apply"));
        assert_eq!(event.time.as_deref(), Some("13:00"));
        assert_eq!(event.line_keyword.as_deref(), Some("fair2025"));
        assert_eq!(event.description, None);
        assert!(event.id.is_none());
    }

    #[test]
    fn test_sheet_rows_without_title_or_date_are_skipped() {
        assert!(event_from_sheet_row(&row(&["", "", "", "2025-05-10"])).is_none());
        assert!(event_from_sheet_row(&row(&["", "", "Fair", ""])).is_none());
        assert!(event_from_sheet_row(&row(&["", "", "Fair", "next week"])).is_none());
    }

    #[test]
    fn test_import_replaces_only_jobfair() {
        let store = MemoryEventStore::with_events(vec![
            CalendarEvent::new(date(2025, 5, 5), "old fair", JOBFAIR_TYPE, "tokyo"),
            CalendarEvent::new(date(2025, 5, 6), "internal", "internal", "osaka"),
        ]);
        let service = CalendarService::new(store);

        let sheet = "no,owner,title,date,place\n\
                     1,a,New Fair,2025-05-20,大阪\n\
                     2,b,,2025-05-21,東京\n";
        let summary = service.import_sheet(sheet).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });

        let all = service.store().all().unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["internal", "New Fair"]);
        assert_eq!(all[1].location, "osaka");
    }

    #[test]
    fn test_import_keeps_quoted_multiline_cells() {
        let service = CalendarService::new(MemoryEventStore::new());
        let sheet = "a,b,c,d,e,f,g,h\n1,2,Fair,2025-06-01,東京,,,\"IT,\n金融\"\n";
        service.import_sheet(sheet).unwrap();

        let all = service.store().all().unwrap();
        assert_eq!(all[0].description.as_deref(), Some("【業界】\nIT,\n金融"));
    }

    #[test]
    fn test_header_only_sheet_is_rejected() {
        let service = CalendarService::new(MemoryEventStore::new());
        assert!(service.import_sheet("title,date\n").is_err());
        assert!(service.import_sheet("").is_err());
    }

    #[test]
    fn test_upcoming_merges_store_and_rule() {
        let store = MemoryEventStore::with_events(vec![
            CalendarEvent::new(date(2025, 5, 3), "fair", JOBFAIR_TYPE, "tokyo"),
            CalendarEvent::new(date(2025, 8, 1), "later", JOBFAIR_TYPE, "tokyo"),
        ]);
        let service = CalendarService::new(store);

        let events = service.upcoming(date(2025, 5, 20)).unwrap();
        assert_eq!(events.len(), 10);
        assert_eq!(events[0].title, "学生定期集会");
        assert_eq!(events[1].title, "fair");
        assert!(events.iter().all(|e| e.title != "later"));
    }
}
