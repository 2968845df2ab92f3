//! Floorsheet Collector - resumable NEPSE floor sheet harvesting
//!
//! Incrementally collects paginated floor sheet rows from the exchange site,
//! deduplicates them against previously collected data, and persists the result
//! across interruptions, failures, and a hard wall-clock deadline.
//!
//! The browser binding is deliberately not part of this crate: consumers
//! implement [`PageSource`] over whatever automation driver they use and hand
//! it to [`run_session`]. Everything with real state and failure semantics,
//! the store, the pagination controller, the deadline guard, and the session
//! runner, lives here and is testable without a browser.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod test_utils;

// Re-export the public surface for easier access
pub use application::controller::{AbortReason, ControllerOutcome, PaginationController};
pub use application::deadline::DeadlineGuard;
pub use application::session::{SessionError, SessionOutcome, SessionReport, run_session};
pub use domain::page_source::{ExtractionError, ExtractionStep, PageSource, RawRow};
pub use domain::record::FloorSheetRecord;
pub use domain::store::RecordStore;
pub use infrastructure::config::SessionConfig;
