//! Page source capability
//!
//! Narrow interface over the paginated floor sheet page. A concrete
//! implementation binds it to a browser automation driver; the pagination
//! controller only ever sees this surface, which keeps it fully unit-testable
//! with a scripted fake.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Marker phrases identifying summary rows the site appends to the data table.
const ARTIFACT_MARKERS: [&str; 2] = ["Total Amount:", "Total Turnover:"];

/// One raw table row as extracted from the page: ordered cell texts.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Whether this row is a summary/total line rather than a transaction.
    ///
    /// Artifact rows must never reach the record store; they would otherwise
    /// be merged as records with empty required fields.
    pub fn is_artifact(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| ARTIFACT_MARKERS.iter().any(|marker| cell.contains(marker)))
    }
}

/// The extraction or navigation step a page source was performing when it
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStep {
    SelectPageSize,
    SubmitFilter,
    FetchPage,
    CheckEndOfData,
    Advance,
}

impl fmt::Display for ExtractionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectPageSize => "page size selection",
            Self::SubmitFilter => "filter submission",
            Self::FetchPage => "page fetch",
            Self::CheckEndOfData => "end-of-data check",
            Self::Advance => "page advance",
        };
        f.write_str(name)
    }
}

/// Error raised by a page source during any extraction or navigation step.
///
/// The controller never retries these; it aborts the run and lets the session
/// runner persist whatever was merged so far.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct ExtractionError {
    pub step: ExtractionStep,
    #[source]
    pub source: anyhow::Error,
}

impl ExtractionError {
    pub fn new(step: ExtractionStep, source: impl Into<anyhow::Error>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}

/// Capability interface over the paginated floor sheet page.
///
/// Calls are issued sequentially by a single task; each fetch is
/// order-dependent on the prior advance, so implementations never see
/// concurrent invocations. Timeouts within a single step are the
/// implementation's own concern.
#[async_trait]
pub trait PageSource: Send {
    /// Request the given page size from the page-size dropdown.
    async fn select_page_size(&mut self, size: &str) -> Result<(), ExtractionError>;

    /// Submit the filter form, loading the first page of results.
    async fn submit_filter(&mut self) -> Result<(), ExtractionError>;

    /// Read every row currently rendered in the results table.
    async fn fetch_current_page(&mut self) -> Result<Vec<RawRow>, ExtractionError>;

    /// Whether the "next page" affordance is disabled, meaning the current
    /// page is the last one.
    async fn is_end_of_data(&mut self) -> Result<bool, ExtractionError>;

    /// Navigate to the next page of results.
    async fn advance_to_next_page(&mut self) -> Result<(), ExtractionError>;
}
