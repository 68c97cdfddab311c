//! Weighted tallies that read and persist their own baseline.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use upvote_store::{GetStore, InsertStore};
use upvote_tally::{TallyAlgorithm, TallyError, WeightedTallyAlgorithm};

use crate::translate::{run_or_translate, Responder};
use crate::Fault;

/// What a weighted tally does when the baseline read fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaselinePolicy {
    /// Log the fault and continue with an empty baseline.
    #[default]
    EmptyOnFault,
    /// Answer with the fault response and skip the computation.
    FailOnFault,
}

/// A [`WeightedTallyAlgorithm`] bound to the table holding its weights.
///
/// One run reads the baseline from `store`, runs `algorithm` over the
/// entries and the baseline, then appends the updated weights to `store`
/// with a single `insert_all`. The append is the step whose failure always
/// reaches the responder. When the algorithm reports no updated weights
/// nothing is written and the run still answers `persisted`.
///
/// Implements [`TallyAlgorithm`] with the responder's response as output,
/// so it can be handed to a [`StoreVoteManager`](crate::StoreVoteManager)
/// like any plain algorithm. Its `execute` never returns `Err`.
pub struct StoredWeightedTally<W, S: ?Sized, P, A> {
    store: Arc<S>,
    responder: P,
    algorithm: A,
    policy: BaselinePolicy,
    _weight: PhantomData<fn() -> W>,
}

impl<W, S: ?Sized, P, A> StoredWeightedTally<W, S, P, A> {
    pub fn new(store: Arc<S>, responder: P, algorithm: A) -> Self {
        Self {
            store,
            responder,
            algorithm,
            policy: BaselinePolicy::default(),
            _weight: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: BaselinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> BaselinePolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<W, S, P, A> StoredWeightedTally<W, S, P, A>
where
    S: InsertStore<W> + GetStore<W> + ?Sized,
    P: Responder,
{
    /// Read the stored weights, applying the baseline policy on failure.
    pub fn baseline(&self) -> Result<Vec<W>, Fault> {
        match self.store.get_all() {
            Ok(rows) => Ok(rows),
            Err(error) => match self.policy {
                BaselinePolicy::EmptyOnFault => {
                    tracing::warn!(%error, "baseline read failed, tallying from an empty baseline");
                    Ok(Vec::new())
                }
                BaselinePolicy::FailOnFault => Err(error.into()),
            },
        }
    }

    /// Compute updated weights from `entries` and `baseline`, then persist
    /// them. Skips the baseline read.
    pub fn execute_with_baseline<E>(&self, entries: &[E], baseline: Vec<W>) -> P::Response
    where
        A: WeightedTallyAlgorithm<E, W>,
    {
        run_or_translate(
            || {
                let updated = self.algorithm.execute_weighted(entries, baseline)?;
                if !updated.is_empty() {
                    self.store.insert_all(&updated)?;
                }
                Ok(updated.len())
            },
            |count| {
                tracing::debug!(entries = entries.len(), count, "persisted updated weights");
                self.responder.persisted()
            },
            |fault| self.responder.fault(fault),
        )
    }
}

impl<E, W, S, P, A> TallyAlgorithm<E> for StoredWeightedTally<W, S, P, A>
where
    S: InsertStore<W> + GetStore<W> + ?Sized,
    P: Responder,
    A: WeightedTallyAlgorithm<E, W>,
{
    type Output = P::Response;

    fn execute(&self, entries: &[E]) -> Result<P::Response, TallyError> {
        Ok(run_or_translate(
            || self.baseline(),
            |baseline| self.execute_with_baseline(entries, baseline),
            |fault| self.responder.fault(fault),
        ))
    }
}

impl<W, S: ?Sized, P, A: fmt::Debug> fmt::Debug for StoredWeightedTally<W, S, P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredWeightedTally")
            .field("algorithm", &self.algorithm)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
