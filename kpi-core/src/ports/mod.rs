//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod event_store;
mod sheet_source;

pub use event_store::EventStore;
pub use sheet_source::SheetSource;
