//! Core engine for Rankwise - interactive sorting and application state.
//!
//! This crate contains the sort session and the App state machine without TUI
//! dependencies. The TUI crate renders [`App`] and feeds key presses back in.

mod cache;
mod comparator;
mod config;
mod oracle;
mod session;
mod state;

pub use cache::{AnswerCache, CachedAnswer};
pub use config::{
    AppConfig, CONFIG_PATH_ENV, ConfigError, OutputConfig, OutputFormat, RankwiseConfig,
    SortConfig, config_path,
};
pub use oracle::{
    ChannelOracle, FnOracle, Oracle, OracleError, OracleHandle, PendingComparison, channel,
};
pub use rankwise_types::{
    EmptyItemError, InputError, Item, ItemKind, ItemList, Outcome, Reply, ui::UiOptions,
    ui::ViewState,
};
pub use session::{
    SortError, SortResult, SortSession, SortStats, UndoPolicy, max_questions, rank, sort,
};

use std::mem;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use state::Phase;

// ============================================================================
// App - front-end state for one ranking run
// ============================================================================

/// Owns the running sort session and whatever question it is waiting on.
///
/// Must be created inside a tokio runtime: the session runs on its own task
/// and talks to the App through a [`channel`] oracle.
#[derive(Debug)]
pub struct App {
    items: ItemList,
    phase: Phase,
    handle: OracleHandle,
    outcome: oneshot::Receiver<Result<SortResult, SortError>>,
    task: JoinHandle<()>,
    view: ViewState,
    /// Answers given minus answers undone.
    answered: usize,
    max_questions: usize,
    should_quit: bool,
    tick: usize,
}

impl App {
    /// Start ranking `items` best-first.
    pub fn start(items: ItemList, config: &RankwiseConfig) -> Self {
        let (mut oracle, handle) = channel();
        let (done_tx, outcome) = oneshot::channel();
        let undo_policy = config.undo_policy();
        let session_items = items.clone();

        let task = tokio::spawn(async move {
            let result = rank(&session_items, &mut oracle, undo_policy).await;
            // The App may already be gone (quit mid-session); nothing to report then.
            let _ = done_tx.send(result);
        });

        Self {
            max_questions: max_questions(items.len()),
            items,
            phase: Phase::Waiting,
            handle,
            outcome,
            task,
            view: ViewState::new(config.ui_options()),
            answered: 0,
            should_quit: false,
            tick: 0,
        }
    }

    /// Advance state: pick up a finished session or the next question.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.phase.is_terminal() {
            return;
        }

        match self.outcome.try_recv() {
            Ok(Ok(result)) => {
                debug!(sorted = result.is_sorted(), "Session result received");
                self.phase = Phase::Finished(result);
                return;
            }
            Ok(Err(err)) => {
                warn!("Sort failed: {err}");
                self.phase = Phase::Failed(err.to_string());
                return;
            }
            Err(TryRecvError::Closed) => {
                let err = SortError::Interrupted("session task exited without a result".into());
                warn!("Sort failed: {err}");
                self.phase = Phase::Failed(err.to_string());
                return;
            }
            Err(TryRecvError::Empty) => {}
        }

        if matches!(self.phase, Phase::Waiting)
            && let Some(pending) = self.handle.try_next()
        {
            self.phase = Phase::Asking(pending);
        }
    }

    fn reply(&mut self, reply: Reply) -> bool {
        let pending = match mem::replace(&mut self.phase, Phase::Waiting) {
            Phase::Asking(pending) => pending,
            other => {
                self.phase = other;
                return false;
            }
        };
        if !pending.resolve(reply) {
            debug!("Reply arrived after the session ended");
        }
        true
    }

    /// The item shown first is better.
    pub fn answer_first(&mut self) {
        self.answer(Outcome::Superior);
    }

    /// The item shown second is better.
    pub fn answer_second(&mut self) {
        self.answer(Outcome::Inferior);
    }

    pub fn answer_equal(&mut self) {
        self.answer(Outcome::Equal);
    }

    pub fn answer(&mut self, outcome: Outcome) {
        if self.reply(Reply::Answer(outcome)) {
            self.answered += 1;
        }
    }

    /// Retract the previous answer and ask again.
    pub fn undo(&mut self) {
        if self.reply(Reply::Undo) {
            self.answered = self.answered.saturating_sub(1);
        }
    }

    /// Abandon the sort; the list is left as it was given.
    pub fn stop(&mut self) {
        self.reply(Reply::Stop);
    }

    /// Quit the application, stopping any pending question first.
    pub fn request_quit(&mut self) {
        self.stop();
        self.should_quit = true;
    }

    pub fn toggle_help(&mut self) {
        self.view.show_help = !self.view.show_help;
    }

    pub fn scroll_results_up(&mut self) {
        self.view.scroll_up(1);
    }

    pub fn scroll_results_down(&mut self) {
        let len = self.result().map_or(0, |result| result.items().len());
        self.view.scroll_down(1, len);
    }

    /// Abort the session task. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.task.abort();
    }

    /// Hand back the final result once the App is done with.
    #[must_use]
    pub fn into_result(mut self) -> Option<SortResult> {
        self.task.abort();
        match mem::replace(&mut self.phase, Phase::Waiting) {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Read accessors for rendering
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn question(&self) -> Option<(&Item, &Item)> {
        match &self.phase {
            Phase::Asking(pending) => Some((pending.first(), pending.second())),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&SortResult> {
        match &self.phase {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn is_asking(&self) -> bool {
        matches!(self.phase, Phase::Asking(_))
    }

    #[must_use]
    pub fn items(&self) -> &ItemList {
        &self.items
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Worst-case number of questions for this list.
    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.view.ui_options
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.task.abort();
    }
}
