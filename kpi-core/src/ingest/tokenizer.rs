//! Delimiter-resolving tokenizer for spreadsheet CSV exports
//!
//! Spreadsheet exports switch between `,` and `;` depending on the locale of
//! whoever downloaded them, so the separator is chosen per document from the
//! header line. Quoting is not interpreted: a `"` is ordinary cell data.

use tracing::{debug, warn};

/// A tokenized document: trimmed header cells plus raw data records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub delimiter: u8,
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Tokenized {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `;` only when the header has semicolons and no commas
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') && !header_line.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Split raw CSV text into a header and data records
///
/// Lines are trimmed and blank lines dropped before anything else; a document
/// with one line or less (empty or header-only) yields no records.
pub fn tokenize(text: &str) -> Tokenized {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() <= 1 {
        debug!(lines = lines.len(), "document has no data lines");
        return Tokenized::default();
    }

    let delimiter = detect_delimiter(lines[0]);
    let joined = lines.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .delimiter(delimiter)
        .from_reader(joined.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(lines.len());
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => warn!(line = idx + 1, error = %e, "skipping unreadable CSV line"),
        }
    }

    let mut rows = rows.into_iter();
    let header: Vec<String> = match rows.next() {
        Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Tokenized::default(),
    };
    let records: Vec<Vec<String>> = rows.collect();

    debug!(
        delimiter = %(delimiter as char),
        columns = header.len(),
        records = records.len(),
        "tokenized document"
    );

    Tokenized {
        delimiter,
        header,
        records,
    }
}
