//! The answering side of a sort session.
//!
//! An [`Oracle`] is asked one question at a time and resolves it to a
//! [`Reply`]: an answer, or a Stop / Undo signal. The session holds its
//! oracle by `&mut`, so a second outstanding request cannot be expressed.
//!
//! ```text
//! SortSession --compare(a, b)--> ChannelOracle --mpsc--> OracleHandle (front end)
//!      ^                                                     |
//!      |                                                     v
//!      +-------------------oneshot reply----------- PendingComparison::resolve
//! ```

use std::fmt;
use std::future::{self, Future};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use rankwise_types::{Item, Reply};

/// Failures that end a session. Stop and Undo are not errors.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The front end dropped its [`OracleHandle`].
    #[error("comparison front end has shut down")]
    Disconnected,
    /// A [`PendingComparison`] was dropped without being resolved.
    #[error("comparison request was dropped without a reply")]
    Abandoned,
    #[error("oracle failed: {0}")]
    Failed(String),
}

pub trait Oracle {
    /// Ask whether `first` is superior to `second`.
    fn compare(
        &mut self,
        first: &Item,
        second: &Item,
    ) -> impl Future<Output = Result<Reply, OracleError>> + Send;
}

// ============================================================================
// FnOracle - synchronous closure
// ============================================================================

/// Answers with a plain closure. Resolves immediately; used for scripted
/// sorting and tests.
pub struct FnOracle<F>(F);

impl<F> FnOracle<F>
where
    F: FnMut(&Item, &Item) -> Reply + Send,
{
    pub fn new(answer: F) -> Self {
        Self(answer)
    }
}

impl<F> fmt::Debug for FnOracle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOracle").finish_non_exhaustive()
    }
}

impl<F> Oracle for FnOracle<F>
where
    F: FnMut(&Item, &Item) -> Reply + Send,
{
    fn compare(
        &mut self,
        first: &Item,
        second: &Item,
    ) -> impl Future<Output = Result<Reply, OracleError>> + Send {
        future::ready(Ok((self.0)(first, second)))
    }
}

// ============================================================================
// ChannelOracle - asynchronous front end
// ============================================================================

/// One question handed to the front end.
///
/// Consuming `resolve` is the only way to answer, so every request is
/// answered at most once. Dropping it unanswered fails the session with
/// [`OracleError::Abandoned`].
#[derive(Debug)]
pub struct PendingComparison {
    first: Item,
    second: Item,
    responder: oneshot::Sender<Reply>,
}

impl PendingComparison {
    #[must_use]
    pub fn first(&self) -> &Item {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &Item {
        &self.second
    }

    /// Deliver the reply. Returns `false` if the session is already gone.
    pub fn resolve(self, reply: impl Into<Reply>) -> bool {
        self.responder.send(reply.into()).is_ok()
    }
}

/// Session side of the channel pair.
#[derive(Debug)]
pub struct ChannelOracle {
    requests: mpsc::Sender<PendingComparison>,
}

/// Front-end side of the channel pair.
#[derive(Debug)]
pub struct OracleHandle {
    requests: mpsc::Receiver<PendingComparison>,
}

/// Create a connected oracle / handle pair.
#[must_use]
pub fn channel() -> (ChannelOracle, OracleHandle) {
    // Capacity 1: the session never has more than one question in flight.
    let (tx, rx) = mpsc::channel(1);
    (ChannelOracle { requests: tx }, OracleHandle { requests: rx })
}

impl Oracle for ChannelOracle {
    async fn compare(&mut self, first: &Item, second: &Item) -> Result<Reply, OracleError> {
        let (responder, reply) = oneshot::channel();
        let request = PendingComparison {
            first: first.clone(),
            second: second.clone(),
            responder,
        };
        self.requests
            .send(request)
            .await
            .map_err(|_| OracleError::Disconnected)?;
        reply.await.map_err(|_| OracleError::Abandoned)
    }
}

impl OracleHandle {
    /// Non-blocking poll for the next question (used from the frame loop).
    pub fn try_next(&mut self) -> Option<PendingComparison> {
        self.requests.try_recv().ok()
    }

    /// Wait for the next question. `None` once the session has finished.
    pub async fn next(&mut self) -> Option<PendingComparison> {
        self.requests.recv().await
    }
}
