//! Sheet source port - fetches raw spreadsheet export text

use std::sync::Arc;

use crate::domain::result::Result;

/// Source of CSV text for a configured URL
///
/// Implementations own their own timeouts. The dashboard treats any error as
/// "no data" for that family, so callers never see a failed fetch surface.
pub trait SheetSource: Send + Sync {
    /// Source name for logging (e.g., "http", "static")
    fn name(&self) -> &str;

    /// Fetch the full document body
    fn fetch_text(&self, url: &str) -> Result<String>;
}

impl<T: SheetSource + ?Sized> SheetSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        (**self).fetch_text(url)
    }
}

impl<T: SheetSource + ?Sized> SheetSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        (**self).fetch_text(url)
    }
}
