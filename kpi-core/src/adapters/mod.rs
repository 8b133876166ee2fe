//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest blocking client for SheetSource
//! - JSON file for EventStore
//! - In-memory sources and stores for tests and offline runs

pub mod http;
pub mod json_store;
pub mod memory;

pub use http::HttpSheetSource;
pub use json_store::JsonEventStore;
pub use memory::{MemoryEventStore, StaticSheetSource};
