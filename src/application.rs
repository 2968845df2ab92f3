//! Application layer - the pagination controller, deadline guard, and session
//! runner that orchestrate one collection run end to end.

pub mod controller;
pub mod deadline;
pub mod session;

pub use controller::{AbortReason, ControllerOutcome, ControllerState, PaginationController};
pub use deadline::DeadlineGuard;
pub use session::{SessionError, SessionOutcome, SessionReport, run_session};
