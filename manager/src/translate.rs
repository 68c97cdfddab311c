//! Turning fallible operations into responses.
//!
//! [`run_or_translate`] is the single place where a [`Fault`] stops being an
//! error and becomes a response. Everything that persists or tallies goes
//! through it.

use std::fmt;
use std::sync::Arc;

use upvote_store::{InsertStore, RecordId};

use crate::Fault;

/// Builds responses for the outcomes a manager can reach.
///
/// None of the methods can fail: a translator that cannot describe a fault
/// has nothing left to fall back on, so the signature leaves no room for it.
pub trait Responder {
    type Response;

    /// A single record was stored under `id`.
    fn inserted(&self, id: RecordId) -> Self::Response;

    /// A batch of records was stored.
    fn persisted(&self) -> Self::Response;

    /// The operation failed.
    fn fault(&self, fault: Fault) -> Self::Response;
}

impl<P: Responder + ?Sized> Responder for Arc<P> {
    type Response = P::Response;

    fn inserted(&self, id: RecordId) -> Self::Response {
        (**self).inserted(id)
    }

    fn persisted(&self) -> Self::Response {
        (**self).persisted()
    }

    fn fault(&self, fault: Fault) -> Self::Response {
        (**self).fault(fault)
    }
}

type Callback<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// A [`Responder`] assembled from three closures.
pub struct FnResponder<R> {
    inserted: Callback<RecordId, R>,
    persisted: Arc<dyn Fn() -> R + Send + Sync>,
    fault: Callback<Fault, R>,
}

impl<R> FnResponder<R> {
    pub fn new(
        inserted: impl Fn(RecordId) -> R + Send + Sync + 'static,
        persisted: impl Fn() -> R + Send + Sync + 'static,
        fault: impl Fn(Fault) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            inserted: Arc::new(inserted),
            persisted: Arc::new(persisted),
            fault: Arc::new(fault),
        }
    }
}

impl<R> Clone for FnResponder<R> {
    fn clone(&self) -> Self {
        Self {
            inserted: Arc::clone(&self.inserted),
            persisted: Arc::clone(&self.persisted),
            fault: Arc::clone(&self.fault),
        }
    }
}

impl<R> fmt::Debug for FnResponder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResponder").finish_non_exhaustive()
    }
}

impl<R> Responder for FnResponder<R> {
    type Response = R;

    fn inserted(&self, id: RecordId) -> R {
        (self.inserted)(id)
    }

    fn persisted(&self) -> R {
        (self.persisted)()
    }

    fn fault(&self, fault: Fault) -> R {
        (self.fault)(fault)
    }
}

/// Run `operation` and build a response from its outcome.
///
/// Exactly one of `on_success` and `on_fault` is called. Faults are logged
/// at `warn` before they are translated.
pub fn run_or_translate<T, R>(
    operation: impl FnOnce() -> Result<T, Fault>,
    on_success: impl FnOnce(T) -> R,
    on_fault: impl FnOnce(Fault) -> R,
) -> R {
    match operation() {
        Ok(value) => on_success(value),
        Err(fault) => {
            tracing::warn!(kind = ?fault.kind(), error = %fault, "operation failed");
            on_fault(fault)
        }
    }
}

/// Insert one record and describe the outcome with `responder`.
pub fn persist_one<D, S, P>(store: &S, record: &D, responder: &P) -> P::Response
where
    S: InsertStore<D> + ?Sized,
    P: Responder + ?Sized,
{
    run_or_translate(
        || Ok(store.insert(record)?),
        |id| {
            tracing::debug!(%id, "persisted entry");
            responder.inserted(id)
        },
        |fault| responder.fault(fault),
    )
}

/// Insert a batch of records and describe the outcome with `responder`.
pub fn persist_all<D, S, P>(store: &S, records: &[D], responder: &P) -> P::Response
where
    S: InsertStore<D> + ?Sized,
    P: Responder + ?Sized,
{
    run_or_translate(
        || Ok(store.insert_all(records)?),
        |()| {
            tracing::debug!(count = records.len(), "persisted batch");
            responder.persisted()
        },
        |fault| responder.fault(fault),
    )
}
