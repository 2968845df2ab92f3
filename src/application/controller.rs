//! # Pagination Controller
//!
//! Drives the page source page by page: fetch, filter artifact rows, merge
//! into the record store, check for the end of data, advance. Termination is
//! either `Done` (the site reports no further pages), or `Aborted` on an
//! extraction failure or on cooperative cancellation from the deadline guard.
//!
//! Cancellation is checked once per iteration boundary. An in-flight step is
//! always allowed to finish, so an abort never straddles a half-consumed page.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::page_source::{ExtractionError, PageSource};
use crate::domain::record::FloorSheetRecord;
use crate::domain::store::RecordStore;

/// States of the pagination loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Init,
    Filtering,
    FetchingPage,
    Merging,
    CheckTerminal,
    Advancing,
    Done,
    Aborted,
}

/// Why a run ended in [`ControllerState::Aborted`].
#[derive(Debug)]
pub enum AbortReason {
    /// The deadline guard cancelled the run. Planned, user-visible
    /// termination rather than a failure.
    DeadlineExceeded,
    /// The page source failed while working on the given page. Not retried
    /// here; re-running the whole session resumes from the persisted store.
    Extraction {
        page: u32,
        source: ExtractionError,
    },
}

/// Result of a controller run.
///
/// `Aborted` leaves the store exactly as the last completed merge left it;
/// the session runner persists it either way.
#[derive(Debug)]
pub enum ControllerOutcome {
    Done {
        pages_fetched: u32,
        records_appended: usize,
    },
    Aborted {
        reason: AbortReason,
        pages_fetched: u32,
        records_appended: usize,
    },
}

/// State machine driving one pagination run over a [`PageSource`].
pub struct PaginationController {
    page_size: String,
    post_filter_delay: Duration,
    page_settle_delay: Duration,
    state: ControllerState,
}

impl PaginationController {
    pub fn new(
        page_size: impl Into<String>,
        post_filter_delay: Duration,
        page_settle_delay: Duration,
    ) -> Self {
        Self {
            page_size: page_size.into(),
            post_filter_delay,
            page_settle_delay,
            state: ControllerState::Init,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Run the pagination loop to completion, merging every fetched page into
    /// `store`. The `cancel` token is polled at each iteration boundary.
    pub async fn run<S: PageSource>(
        &mut self,
        source: &mut S,
        store: &mut RecordStore,
        cancel: &CancellationToken,
    ) -> ControllerOutcome {
        let mut pages_fetched: u32 = 0;
        let mut appended_total: usize = 0;
        let mut page_number: u32 = 1;

        // One-time setup before the loop: page size and filter submission.
        self.transition(ControllerState::Filtering);
        if let Err(source) = self.apply_filter(source).await {
            return self.abort(
                AbortReason::Extraction {
                    page: page_number,
                    source,
                },
                pages_fetched,
                appended_total,
            );
        }

        loop {
            if cancel.is_cancelled() {
                return self.abort(AbortReason::DeadlineExceeded, pages_fetched, appended_total);
            }

            self.transition(ControllerState::FetchingPage);
            debug!(page = page_number, "fetching page");
            let raw_rows = match source.fetch_current_page().await {
                Ok(rows) => rows,
                Err(source) => {
                    return self.abort(
                        AbortReason::Extraction {
                            page: page_number,
                            source,
                        },
                        pages_fetched,
                        appended_total,
                    );
                }
            };
            pages_fetched += 1;

            self.transition(ControllerState::Merging);
            let page_records: Vec<FloorSheetRecord> = raw_rows
                .iter()
                .filter(|row| !row.is_artifact())
                .map(|row| FloorSheetRecord::from_cells(&row.cells))
                .collect();
            let appended = store.merge(page_records);
            appended_total += appended;
            info!(
                page = page_number,
                rows = raw_rows.len(),
                appended,
                total = store.len(),
                "merged page"
            );

            self.transition(ControllerState::CheckTerminal);
            let last_page = match source.is_end_of_data().await {
                Ok(last) => last,
                Err(source) => {
                    return self.abort(
                        AbortReason::Extraction {
                            page: page_number,
                            source,
                        },
                        pages_fetched,
                        appended_total,
                    );
                }
            };
            if last_page {
                self.transition(ControllerState::Done);
                info!(
                    pages = pages_fetched,
                    appended = appended_total,
                    "pagination complete"
                );
                return ControllerOutcome::Done {
                    pages_fetched,
                    records_appended: appended_total,
                };
            }

            self.transition(ControllerState::Advancing);
            if let Err(source) = source.advance_to_next_page().await {
                return self.abort(
                    AbortReason::Extraction {
                        page: page_number,
                        source,
                    },
                    pages_fetched,
                    appended_total,
                );
            }
            // Page number advances once per fetched page regardless of how
            // many rows merged; it is a progress signal, not a correctness
            // input.
            page_number += 1;
            sleep(self.page_settle_delay).await;
        }
    }

    async fn apply_filter<S: PageSource>(&self, source: &mut S) -> Result<(), ExtractionError> {
        source.select_page_size(&self.page_size).await?;
        source.submit_filter().await?;
        sleep(self.post_filter_delay).await;
        Ok(())
    }

    fn transition(&mut self, next: ControllerState) {
        debug!(from = ?self.state, to = ?next, "controller transition");
        self.state = next;
    }

    fn abort(
        &mut self,
        reason: AbortReason,
        pages_fetched: u32,
        records_appended: usize,
    ) -> ControllerOutcome {
        match &reason {
            AbortReason::DeadlineExceeded => {
                warn!(pages = pages_fetched, "deadline reached, stopping before next page");
            }
            AbortReason::Extraction { page, source } => {
                error!(page, error = %source, "extraction failed, aborting run");
            }
        }
        self.transition(ControllerState::Aborted);
        ControllerOutcome::Aborted {
            reason,
            pages_fetched,
            records_appended,
        }
    }
}
