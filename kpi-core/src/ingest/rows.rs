//! Row mapping: tokenized records -> canonical `MetricRow`s

use tracing::debug;

use super::columns::{ColumnSchema, Field, ResolvedColumns};
use super::number::{normalize_number, parse_integer};
use super::tokenizer::{tokenize, Tokenized};
use crate::domain::{MetricFamily, MetricKind, MetricRow};

/// Mapped rows plus how many records were dropped for a bad period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingReport {
    pub rows: Vec<MetricRow>,
    pub dropped: usize,
}

/// Map every record of a tokenized document for one metric kind
///
/// Output keeps input order; sorting is left to the series builder.
pub fn map_rows(doc: &Tokenized, kind: MetricKind) -> MappingReport {
    let schema = ColumnSchema::for_kind(kind);
    let columns = schema.resolve(&doc.header);

    let mut report = MappingReport {
        rows: Vec::with_capacity(doc.records.len()),
        dropped: 0,
    };

    for (idx, record) in doc.records.iter().enumerate() {
        match map_record(record, &columns) {
            Some(row) => report.rows.push(row),
            None => {
                debug!(schema = schema.name, record = idx + 1, "dropping row without a valid year/month");
                report.dropped += 1;
            }
        }
    }

    report
}

fn map_record(record: &[String], columns: &ResolvedColumns) -> Option<MetricRow> {
    let year: i32 = parse_integer(cell(record, columns, Field::Year))?;
    let month: u32 = parse_integer(cell(record, columns, Field::Month))?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let number = |field| normalize_number(cell(record, columns, field));
    let note = cell(record, columns, Field::Note).trim();

    Some(MetricRow {
        year,
        month,
        actual: number(Field::Actual),
        target: number(Field::Target),
        cumulative_actual: number(Field::CumulativeActual),
        cumulative_target: number(Field::CumulativeTarget),
        annual_target: number(Field::AnnualTarget),
        note: (!note.is_empty()).then(|| note.to_string()),
    })
}

/// Cell text for a field; unresolved columns and short rows read as empty
fn cell<'a>(record: &'a [String], columns: &ResolvedColumns, field: Field) -> &'a str {
    columns
        .get(field)
        .and_then(|idx| record.get(idx))
        .map(String::as_str)
        .unwrap_or("")
}

/// Tokenize and map a document for a single kind
pub fn parse_document(text: &str, kind: MetricKind) -> Vec<MetricRow> {
    map_rows(&tokenize(text), kind).rows
}

/// Tokenize once and map every kind the family's document carries
pub fn map_family(text: &str, family: MetricFamily) -> Vec<(MetricKind, MappingReport)> {
    let doc = tokenize(text);
    family
        .kinds()
        .iter()
        .map(|kind| (*kind, map_rows(&doc, *kind)))
        .collect()
}
