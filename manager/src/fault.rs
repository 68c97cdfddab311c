use serde::{Deserialize, Serialize};
use thiserror::Error;
use upvote_store::StoreError;
use upvote_tally::TallyError;

/// Any failure raised while serving a manager operation.
#[derive(Debug, Error)]
pub enum Fault {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Compute(#[from] TallyError),
}

/// Coarse classification of a [`Fault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// I/O or connection trouble. Retrying may succeed.
    Transient,
    /// The write was rejected. Retrying the same call will fail again.
    Integrity,
    /// Stored bytes could not be decoded or the database is damaged.
    /// Neither a retry nor a different write will help.
    Corruption,
    /// The tally algorithm could not produce a result.
    Compute,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Store(e) if e.is_transient() => FaultKind::Transient,
            Fault::Store(StoreError::Serialization(_) | StoreError::Corruption(_)) => {
                FaultKind::Corruption
            }
            Fault::Store(_) => FaultKind::Integrity,
            Fault::Compute(_) => FaultKind::Compute,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == FaultKind::Transient
    }
}
