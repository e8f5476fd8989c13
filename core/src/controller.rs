//! Per-feature interaction controllers.
//!
//! # Design
//! A `Controller` drives one feature through `Idle -> Submitting ->
//! Succeeded | Failed` and publishes every transition on a
//! `tokio::sync::watch` channel, so a view observes state without owning it.
//! The machine is the same for every feature; a `Feature` supplies only the
//! precondition check and the client call.
//!
//! Each accepted submission takes a new generation number. A response is
//! applied only if its generation is still current, checked and written
//! under the channel's lock, so a response from a superseded or reset
//! request can never overwrite newer state.
//!
//! The request runs inside the caller's future. If that future is dropped
//! mid-flight, an `Abandoned` guard puts the controller back to `Idle` so the
//! next submission is not ignored forever.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{QueryError, TransportError};

/// One capability a controller can drive.
#[async_trait]
pub trait Feature: Send + Sync + 'static {
    type Query: Send + Sync + 'static;
    type Output: Clone + Send + Sync + 'static;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Client-side precondition. A query that fails it is never sent.
    fn check(&self, query: &Self::Query) -> Result<(), QueryError>;

    async fn run(&self, query: &Self::Query) -> Result<Self::Output, TransportError>;
}

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Submitting,
    Succeeded(T),
    Failed(TransportError),
}

impl<T> Phase<T> {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            Phase::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What a controller published: the phase plus the generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    generation: u64,
    phase: Phase<T>,
}

impl<T> Snapshot<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }
}

/// What happened to one call to `submit` or `supersede`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The query failed its precondition; nothing was sent.
    Rejected(QueryError),
    /// A request was already in flight; nothing was sent.
    Ignored,
    /// The response was applied to the controller's state.
    Applied,
    /// The response arrived after a newer submission or a reset and was dropped.
    Discarded,
}

/// State machine for one feature's queries. Clones share the same state.
pub struct Controller<F: Feature> {
    feature: Arc<F>,
    state: Arc<watch::Sender<Snapshot<F::Output>>>,
}

impl<F: Feature> Clone for Controller<F> {
    fn clone(&self) -> Self {
        Self {
            feature: Arc::clone(&self.feature),
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: Feature> fmt::Debug for Controller<F>
where
    F::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("feature", &F::NAME)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl<F: Feature> Controller<F> {
    /// New controller in `Idle`.
    pub fn new(feature: F) -> Self {
        let (state, _) = watch::channel(Snapshot {
            generation: 0,
            phase: Phase::Idle,
        });
        Self {
            feature: Arc::new(feature),
            state: Arc::new(state),
        }
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Current phase.
    pub fn phase(&self) -> Phase<F::Output> {
        self.state.borrow().phase.clone()
    }

    /// Observe every published transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<F::Output>> {
        self.state.subscribe()
    }

    /// Submit a query. Ignored while another request is in flight.
    pub async fn submit(&self, query: F::Query) -> Submission {
        self.launch(query, false).await
    }

    /// Submit a query even while another is in flight. The older request is
    /// left to finish and its response is discarded.
    pub async fn supersede(&self, query: F::Query) -> Submission {
        self.launch(query, true).await
    }

    /// Return to `Idle`. Any response still in flight will be discarded.
    pub fn reset(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.phase = Phase::Idle;
        });
        debug!(feature = F::NAME, "controller reset");
    }

    async fn launch(&self, query: F::Query, force: bool) -> Submission {
        if let Err(reason) = self.feature.check(&query) {
            debug!(feature = F::NAME, %reason, "submission rejected");
            return Submission::Rejected(reason);
        }

        let mut ticket = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.phase.is_submitting() && !force {
                return false;
            }
            snapshot.generation += 1;
            snapshot.phase = Phase::Submitting;
            ticket = Some(snapshot.generation);
            true
        });
        let Some(generation) = ticket else {
            debug!(feature = F::NAME, "submission ignored, request already in flight");
            return Submission::Ignored;
        };

        debug!(feature = F::NAME, generation, "submitting");
        let _abandoned = Abandoned {
            state: &*self.state,
            generation,
            feature: F::NAME,
        };
        let outcome = self.feature.run(&query).await;
        self.settle(generation, outcome)
    }

    fn settle(&self, generation: u64, outcome: Result<F::Output, TransportError>) -> Submission {
        let applied = self.state.send_if_modified(move |snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.phase = match outcome {
                Ok(result) => Phase::Succeeded(result),
                Err(error) => Phase::Failed(error),
            };
            true
        });

        if applied {
            debug!(feature = F::NAME, generation, "response applied");
            Submission::Applied
        } else {
            debug!(feature = F::NAME, generation, "stale response discarded");
            Submission::Discarded
        }
    }
}

/// Resets a submission still `Submitting` at its own generation. Once the
/// response is settled (or a newer submission took over) dropping it is a
/// no-op.
struct Abandoned<'a, T> {
    state: &'a watch::Sender<Snapshot<T>>,
    generation: u64,
    feature: &'static str,
}

impl<T> Drop for Abandoned<'_, T> {
    fn drop(&mut self) {
        let generation = self.generation;
        let abandoned = self.state.send_if_modified(|snapshot| {
            if snapshot.generation != generation || !snapshot.phase.is_submitting() {
                return false;
            }
            snapshot.phase = Phase::Idle;
            true
        });
        if abandoned {
            debug!(feature = self.feature, generation, "submission abandoned before its response");
        }
    }
}
