//! Cache-first comparison adapter between a session and its oracle.

use tracing::debug;

use rankwise_types::{Item, Outcome, Reply};

use crate::cache::AnswerCache;
use crate::oracle::{Oracle, OracleError};
use crate::session::SortStats;

/// What one comparison step resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Resolved(Outcome),
    Stop,
    /// The last cached answer has already been removed.
    Undo,
}

/// Owns the session's answer cache and borrows the oracle for the session's
/// lifetime.
#[derive(Debug)]
pub(crate) struct Comparator<'o, O> {
    cache: AnswerCache,
    oracle: &'o mut O,
    stats: SortStats,
}

impl<'o, O: Oracle> Comparator<'o, O> {
    pub(crate) fn new(oracle: &'o mut O) -> Self {
        Self {
            cache: AnswerCache::new(),
            oracle,
            stats: SortStats::default(),
        }
    }

    /// Resolve `first` vs `second`, asking the oracle only on a cache miss.
    ///
    /// On Undo the most recent cached answer is popped before the signal is
    /// returned, so the caller always sees a cache consistent with it.
    pub(crate) async fn compare(&mut self, first: &Item, second: &Item) -> Result<Step, OracleError> {
        if let Some(outcome) = self.cache.lookup(first, second) {
            self.stats.cache_hits += 1;
            debug!(%first, %second, %outcome, "Comparison served from cache");
            return Ok(Step::Resolved(outcome));
        }

        self.stats.questions += 1;
        debug!(%first, %second, question = self.stats.questions, "Asking oracle");

        match self.oracle.compare(first, second).await? {
            Reply::Answer(outcome) => {
                self.cache.store(first.clone(), second.clone(), outcome);
                Ok(Step::Resolved(outcome))
            }
            Reply::Stop => {
                debug!("Oracle requested stop");
                Ok(Step::Stop)
            }
            Reply::Undo => {
                self.stats.undos += 1;
                match self.cache.pop_last() {
                    Some(retracted) => debug!(
                        first = %retracted.first,
                        second = %retracted.second,
                        "Retracted last answer"
                    ),
                    None => debug!("Undo requested with no answers cached"),
                }
                Ok(Step::Undo)
            }
        }
    }

    pub(crate) fn stats(&self) -> SortStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &AnswerCache {
        &self.cache
    }
}
