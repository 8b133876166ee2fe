//! Spreadsheet ingest pipeline
//!
//! raw text -> [`tokenizer`] -> [`rows`] (using [`columns`] + [`number`]) -> `Vec<MetricRow>`
//!
//! Everything here is infallible: bad rows are dropped, bad cells become `None`.

pub mod columns;
pub mod number;
pub mod rows;
pub mod tokenizer;

pub use columns::{ColumnSchema, Field, HeaderPredicate, MatchStrategy, ResolvedColumns};
pub use number::{normalize_number, parse_integer};
pub use rows::{map_family, map_rows, parse_document, MappingReport};
pub use tokenizer::{detect_delimiter, tokenize, Tokenized};
