//! # Session Runner
//!
//! Top-level orchestration of one collection run: load the prior store, run
//! the pagination controller under the deadline guard, then persist the
//! store's current contents exactly once as the last action on every exit
//! path. Whatever was merged before an interrupting event is never lost.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info};

use crate::application::controller::{AbortReason, ControllerOutcome, PaginationController};
use crate::application::deadline::DeadlineGuard;
use crate::domain::page_source::{ExtractionError, PageSource};
use crate::domain::store::RecordStore;
use crate::infrastructure::config::SessionConfig;
use crate::infrastructure::storage::{self, StorageError};

/// How a session ended, as reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every page was consumed before the deadline.
    Completed,
    /// The wall-clock budget elapsed first. Data collected so far was
    /// persisted; this is success-with-partial-data, not a failure.
    DeadlineExceeded,
}

/// Summary of a finished session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub pages_fetched: u32,
    pub records_appended: usize,
    pub records_total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Errors a session surfaces to the caller. All are terminal for the run.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The durable artifact could not be loaded. When it exists but is not a
    /// valid record sequence the session refuses to guess at partial
    /// recovery and aborts before any scraping begins.
    #[error("failed to load prior state: {0}")]
    PriorState(#[source] StorageError),

    /// The page source failed mid-run. Partial data was persisted before
    /// this propagated.
    #[error("extraction failed on page {page}: {source}")]
    Extraction {
        page: u32,
        #[source]
        source: ExtractionError,
    },

    /// The final write of the store failed.
    #[error("failed to persist collected records: {0}")]
    Persist(#[source] StorageError),
}

/// Run one end-to-end collection session over `source`.
///
/// Returns `Ok` for both [`SessionOutcome::Completed`] and
/// [`SessionOutcome::DeadlineExceeded`]; extraction failures return `Err`
/// after the partial store has been written.
pub async fn run_session<S: PageSource>(
    source: &mut S,
    config: &SessionConfig,
) -> Result<SessionReport, SessionError> {
    let started_at = Utc::now();

    let prior = storage::load_records(&config.storage_path).map_err(SessionError::PriorState)?;
    if !prior.is_empty() {
        info!(
            records = prior.len(),
            path = %config.storage_path.display(),
            "resuming from previously collected data"
        );
    }
    let mut store = RecordStore::load(prior);

    let mut controller = PaginationController::new(
        config.page_size.clone(),
        config.post_filter_delay(),
        config.page_settle_delay(),
    );
    let guard = DeadlineGuard::new(config.session_deadline());
    let token = guard.token();
    let outcome = guard
        .run(controller.run(source, &mut store, &token))
        .await;

    // Persistence is the last action on every exit path.
    let persisted = storage::persist_records(&config.storage_path, store.records());
    let finished_at = Utc::now();

    match outcome {
        ControllerOutcome::Done {
            pages_fetched,
            records_appended,
        } => {
            persisted.map_err(SessionError::Persist)?;
            info!(
                pages = pages_fetched,
                appended = records_appended,
                total = store.len(),
                path = %config.storage_path.display(),
                "session complete, all data saved"
            );
            Ok(SessionReport {
                outcome: SessionOutcome::Completed,
                pages_fetched,
                records_appended,
                records_total: store.len(),
                started_at,
                finished_at,
            })
        }
        ControllerOutcome::Aborted {
            reason: AbortReason::DeadlineExceeded,
            pages_fetched,
            records_appended,
        } => {
            persisted.map_err(SessionError::Persist)?;
            info!(
                pages = pages_fetched,
                appended = records_appended,
                total = store.len(),
                path = %config.storage_path.display(),
                "deadline reached, partial data saved"
            );
            Ok(SessionReport {
                outcome: SessionOutcome::DeadlineExceeded,
                pages_fetched,
                records_appended,
                records_total: store.len(),
                started_at,
                finished_at,
            })
        }
        ControllerOutcome::Aborted {
            reason: AbortReason::Extraction { page, source },
            ..
        } => {
            // The extraction failure is the error the operator needs to see;
            // a persist failure on top of it is logged, not returned.
            match &persisted {
                Ok(()) => info!(
                    total = store.len(),
                    path = %config.storage_path.display(),
                    "partial data saved after extraction failure"
                ),
                Err(persist_err) => error!(
                    error = %persist_err,
                    "failed to save partial data after extraction failure"
                ),
            }
            Err(SessionError::Extraction { page, source })
        }
    }
}
