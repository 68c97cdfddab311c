//! Managers backed by a table.

use std::marker::PhantomData;
use std::sync::Arc;

use upvote_store::{GetStore, InsertStore};
use upvote_tally::TallyAlgorithm;
use upvote_types::{ReputationEntry, VoteEntry};

use crate::translate::{persist_one, run_or_translate, Responder};
use crate::{InputManager, ReputationManager, VoteManager};

/// Persists entries into a table.
///
/// `transformer` turns an entry into the record type `D` the table stores;
/// `responder` turns the insert outcome into a response. Both are fixed at
/// construction. The table is shared, the manager itself holds no state.
pub struct StoreManager<D, S: ?Sized, F, P> {
    store: Arc<S>,
    transformer: F,
    responder: P,
    _record: PhantomData<fn() -> D>,
}

impl<D, S: ?Sized, F, P> StoreManager<D, S, F, P> {
    pub fn new(store: Arc<S>, transformer: F, responder: P) -> Self {
        Self {
            store,
            transformer,
            responder,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn responder(&self) -> &P {
        &self.responder
    }
}

impl<E, D, S, F, P> InputManager<E> for StoreManager<D, S, F, P>
where
    S: InsertStore<D> + ?Sized,
    F: Fn(E) -> D,
    P: Responder,
{
    type Response = P::Response;

    fn put_entry(&self, entry: E) -> P::Response {
        let record = (self.transformer)(entry);
        persist_one(self.store.as_ref(), &record, &self.responder)
    }
}

/// A [`StoreManager`] for votes that tallies the whole table with `A`.
///
/// Every tally re-reads all stored records; nothing is cached between calls.
pub struct StoreVoteManager<D, S: ?Sized, F, P, A> {
    manager: StoreManager<D, S, F, P>,
    algorithm: A,
}

impl<D, S: ?Sized, F, P, A> StoreVoteManager<D, S, F, P, A> {
    pub fn new(store: Arc<S>, transformer: F, algorithm: A, responder: P) -> Self {
        Self {
            manager: StoreManager::new(store, transformer, responder),
            algorithm,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.manager.store()
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }
}

impl<E, D, S, F, P, A> InputManager<E> for StoreVoteManager<D, S, F, P, A>
where
    S: InsertStore<D> + ?Sized,
    F: Fn(E) -> D,
    P: Responder,
{
    type Response = P::Response;

    fn put_entry(&self, entry: E) -> P::Response {
        self.manager.put_entry(entry)
    }
}

impl<E, D, S, F, P, A> VoteManager<E> for StoreVoteManager<D, S, F, P, A>
where
    E: VoteEntry,
    S: InsertStore<D> + GetStore<D> + ?Sized,
    F: Fn(E) -> D,
    P: Responder,
    A: TallyAlgorithm<D, Output = P::Response>,
{
    fn tally(&self) -> P::Response {
        let responder = self.manager.responder();
        run_or_translate(
            || {
                let records = self.manager.store().get_all()?;
                tracing::debug!(count = records.len(), "tallying stored records");
                Ok(self.algorithm.execute(&records)?)
            },
            |response| response,
            |fault| responder.fault(fault),
        )
    }
}

/// A [`StoreManager`] for reputation assignments.
pub struct StoreReputationManager<D, S: ?Sized, F, P> {
    manager: StoreManager<D, S, F, P>,
}

impl<D, S: ?Sized, F, P> StoreReputationManager<D, S, F, P> {
    pub fn new(store: Arc<S>, transformer: F, responder: P) -> Self {
        Self {
            manager: StoreManager::new(store, transformer, responder),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.manager.store()
    }
}

impl<E, D, S, F, P> InputManager<E> for StoreReputationManager<D, S, F, P>
where
    S: InsertStore<D> + ?Sized,
    F: Fn(E) -> D,
    P: Responder,
{
    type Response = P::Response;

    fn put_entry(&self, entry: E) -> P::Response {
        self.manager.put_entry(entry)
    }
}

impl<E, D, S, F, P> ReputationManager<E> for StoreReputationManager<D, S, F, P>
where
    E: ReputationEntry,
    S: InsertStore<D> + ?Sized,
    F: Fn(E) -> D,
    P: Responder,
{
}
