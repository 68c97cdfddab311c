//! Tally-and-persist coordination.
//!
//! An input manager accepts an entry, transforms it into a storage record,
//! inserts it, and turns the outcome into the caller's response type. A vote
//! manager can also tally: read every stored record and run a
//! [`TallyAlgorithm`](upvote_tally::TallyAlgorithm) over them.
//!
//! Faults never leave a public operation. Storage and compute errors are
//! collected into [`Fault`] and handed to a [`Responder`], which builds the
//! response. The one exception to "every fault is surfaced" is the baseline
//! read of [`StoredWeightedTally`], which by default falls back to an empty
//! baseline (see [`BaselinePolicy`]).
//!
//! Managers hold no mutable state beyond the strategies they were built
//! with. The weighted read-compute-write sequence is not atomic across
//! callers: two concurrent tallies against the same weight table can both
//! read the same baseline and append competing standings.

pub mod fault;
pub mod input;
pub mod store_manager;
pub mod translate;
pub mod weighted;

pub use fault::{Fault, FaultKind};
pub use input::{InputManager, ReputationManager, VoteManager};
pub use store_manager::{StoreManager, StoreReputationManager, StoreVoteManager};
pub use translate::{persist_all, persist_one, run_or_translate, FnResponder, Responder};
pub use weighted::{BaselinePolicy, StoredWeightedTally};
