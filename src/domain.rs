//! Domain module - records, the deduplicating store, and the page source capability
//!
//! This layer has no I/O and no browser dependency; everything here is testable
//! with plain values and a scripted page source.

pub mod page_source;
pub mod record;
pub mod store;

// Re-export commonly used items for convenience
pub use page_source::{ExtractionError, ExtractionStep, PageSource, RawRow};
pub use record::FloorSheetRecord;
pub use store::RecordStore;
