//! Memo of answers already given during one sort session.
//!
//! The cache is an append-only log rather than a map: undo must drop exactly
//! the most recent answer, whatever pair it was for. Lookups check both
//! orderings of a pair, so an answer to (a, b) also answers (b, a).

use rankwise_types::{Item, Outcome};

/// "`first` vs `second` is `outcome`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    pub first: Item,
    pub second: Item,
    pub outcome: Outcome,
}

impl CachedAnswer {
    /// The recorded outcome from the point of view of `first`, if this entry
    /// is about the pair at all.
    fn answer_for(&self, first: &Item, second: &Item) -> Option<Outcome> {
        if self.first == *first && self.second == *second {
            Some(self.outcome)
        } else if self.first == *second && self.second == *first {
            Some(self.outcome.negate())
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct AnswerCache {
    entries: Vec<CachedAnswer>,
}

impl AnswerCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an answer. No deduplication; callers look up first.
    pub fn store(&mut self, first: Item, second: Item, outcome: Outcome) {
        self.entries.push(CachedAnswer {
            first,
            second,
            outcome,
        });
    }

    /// First matching entry in insertion order, negated when the pair was
    /// stored the other way round. `None` means the oracle has to be asked.
    #[must_use]
    pub fn lookup(&self, first: &Item, second: &Item) -> Option<Outcome> {
        self.entries
            .iter()
            .find_map(|entry| entry.answer_for(first, second))
    }

    /// Remove the most recently stored answer.
    pub fn pop_last(&mut self) -> Option<CachedAnswer> {
        self.entries.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
