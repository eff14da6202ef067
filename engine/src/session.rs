//! Binary insertion sort driven by an interactive oracle.
//!
//! # State Machine
//! ```text
//! Init ──> SelectPending ──queue empty──> Done(Sorted)
//!              ^    │
//!              │    v
//!          Insert <─ BinarySearch ──Stop──> Done(Stopped, original list)
//!                     │     ^
//!                     └Undo─┘  (cache popped; same bounds, or replay)
//! ```
//!
//! The sorted prefix grows in ascending order of superiority: the most
//! superior item ends up last. [`rank`] flips this into a best-first list.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use rankwise_types::{Item, ItemList, Outcome};

use crate::comparator::{Comparator, Step};
use crate::oracle::{Oracle, OracleError};

#[derive(Debug, Error)]
pub enum SortError {
    #[error("comparison oracle failed: {0}")]
    Oracle(#[from] OracleError),
    /// The task running the session ended without producing a result.
    #[error("sort session ended unexpectedly: {0}")]
    Interrupted(String),
}

/// What to do when the oracle replies with Undo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoPolicy {
    /// Pop the last answer and re-ask the pending comparison at the same
    /// search bounds.
    #[default]
    RetryStep,
    /// Pop the last answer and rebuild the sort from the original input.
    /// Every earlier answer replays from the cache, so the next question is
    /// the retracted one.
    Replay,
}

impl UndoPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetryStep => "retry_step",
            Self::Replay => "replay",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortStats {
    /// Requests that reached the oracle.
    pub questions: usize,
    pub cache_hits: usize,
    pub undos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortResult {
    Sorted { items: Vec<Item>, stats: SortStats },
    /// Carries the input exactly as it was given.
    Stopped { items: Vec<Item>, stats: SortStats },
}

impl SortResult {
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        matches!(self, Self::Sorted { .. })
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Sorted { items, .. } | Self::Stopped { items, .. } => items,
        }
    }

    #[must_use]
    pub fn stats(&self) -> SortStats {
        match self {
            Self::Sorted { stats, .. } | Self::Stopped { stats, .. } => *stats,
        }
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Self::Sorted { items, .. } | Self::Stopped { items, .. } => items,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Sorted { mut items, stats } => {
                items.reverse();
                Self::Sorted { items, stats }
            }
            Self::Stopped { mut items, stats } => {
                items.reverse();
                Self::Stopped { items, stats }
            }
        }
    }
}

/// One item being placed into the sorted prefix.
///
/// Invariant: `lower <= upper <= sorted.len()`.
#[derive(Debug)]
struct Insertion {
    pending: Item,
    lower: usize,
    upper: usize,
}

impl Insertion {
    fn new(pending: Item, prefix_len: usize) -> Self {
        Self {
            pending,
            lower: 0,
            upper: prefix_len,
        }
    }

    fn is_placed(&self) -> bool {
        self.lower == self.upper
    }

    fn median(&self) -> usize {
        self.lower + (self.upper - self.lower) / 2
    }

    /// Narrow the bounds after comparing `pending` with the item at `median`.
    fn narrow(&mut self, median: usize, outcome: Outcome) {
        match outcome {
            Outcome::Equal => {
                self.lower = median;
                self.upper = median;
            }
            Outcome::Superior => self.lower = median + 1,
            Outcome::Inferior => self.upper = median,
        }
        debug_assert!(self.lower <= self.upper);
    }
}

/// Sorted prefix plus the stack of items still to place.
#[derive(Debug)]
struct WorkingList {
    sorted: Vec<Item>,
    queue: Vec<Item>,
}

impl WorkingList {
    fn new(input: &ItemList) -> Self {
        let mut queue = input.as_slice().to_vec();
        let sorted = queue.pop().into_iter().collect();
        Self { sorted, queue }
    }

    fn select_pending(&mut self) -> Option<Insertion> {
        let pending = self.queue.pop()?;
        Some(Insertion::new(pending, self.sorted.len()))
    }

    fn insert(&mut self, insertion: Insertion) {
        debug_assert!(insertion.is_placed());
        debug_assert!(insertion.lower <= self.sorted.len());
        self.sorted.insert(insertion.lower, insertion.pending);
    }
}

/// A single sort invocation. Consumed by [`SortSession::run`]; all state,
/// including the answer cache, dies with it.
#[derive(Debug, Clone)]
pub struct SortSession {
    input: ItemList,
    undo_policy: UndoPolicy,
}

impl SortSession {
    #[must_use]
    pub fn new(input: ItemList) -> Self {
        Self {
            input,
            undo_policy: UndoPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_undo_policy(mut self, undo_policy: UndoPolicy) -> Self {
        self.undo_policy = undo_policy;
        self
    }

    /// Sort the input, suspending on the oracle for every comparison the
    /// cache cannot answer.
    pub async fn run<O: Oracle>(self, oracle: &mut O) -> Result<SortResult, SortError> {
        info!(
            items = self.input.len(),
            undo_policy = self.undo_policy.as_str(),
            "Sort session started"
        );

        let mut comparator = Comparator::new(oracle);
        let mut work = WorkingList::new(&self.input);

        'session: while let Some(mut insertion) = work.select_pending() {
            while !insertion.is_placed() {
                let median = insertion.median();
                let step = comparator
                    .compare(&insertion.pending, &work.sorted[median])
                    .await?;

                match step {
                    Step::Resolved(outcome) => insertion.narrow(median, outcome),
                    Step::Stop => {
                        let stats = comparator.stats();
                        info!(?stats, "Sort session stopped");
                        return Ok(SortResult::Stopped {
                            items: self.input.into_vec(),
                            stats,
                        });
                    }
                    Step::Undo => match self.undo_policy {
                        UndoPolicy::RetryStep => {}
                        UndoPolicy::Replay => {
                            debug!("Replaying session after undo");
                            work = WorkingList::new(&self.input);
                            continue 'session;
                        }
                    },
                }
            }
            work.insert(insertion);
        }

        let stats = comparator.stats();
        info!(?stats, "Sort session finished");
        Ok(SortResult::Sorted {
            items: work.sorted,
            stats,
        })
    }
}

/// Sort `items` in the engine's native ascending order.
pub async fn sort<O: Oracle>(items: ItemList, oracle: &mut O) -> Result<SortResult, SortError> {
    SortSession::new(items).run(oracle).await
}

/// Best-first ranking: the input is reversed going in and the result
/// reversed coming out, so the most superior item comes first and a stopped
/// session hands back `items` in their original order.
pub async fn rank<O: Oracle>(
    items: &ItemList,
    oracle: &mut O,
    undo_policy: UndoPolicy,
) -> Result<SortResult, SortError> {
    let result = SortSession::new(items.reversed())
        .with_undo_policy(undo_policy)
        .run(oracle)
        .await?;
    Ok(result.reversed())
}

/// Upper bound on oracle questions for `n` items without cache hits or undo.
#[must_use]
pub fn max_questions(n: usize) -> usize {
    (2..=n)
        .map(|prefix_plus_one| prefix_plus_one.next_power_of_two().trailing_zeros() as usize)
        .sum()
}
