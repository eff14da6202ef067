//! Front-end phase state machine.
//!
//! # State Machine
//! ```text
//! ┌──────────┐  question arrives  ┌──────────────────┐
//! │ Waiting  │ ─────────────────> │ Asking(pending)  │
//! └──────────┘ <───────────────── └──────────────────┘
//!      │         reply delivered
//!      │ session task completes
//!      v
//! ┌────────────────┐   ┌────────────────┐
//! │ Finished(res)  │   │ Failed(reason) │
//! └────────────────┘   └────────────────┘
//! ```

use crate::oracle::PendingComparison;
use crate::session::SortResult;

#[derive(Debug)]
pub(crate) enum Phase {
    /// Session is running and has not asked anything yet.
    Waiting,
    /// A question is on screen; owning the request proves it is unanswered.
    Asking(PendingComparison),
    Finished(SortResult),
    Failed(String),
}

impl Phase {
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished(_) | Phase::Failed(_))
    }
}
