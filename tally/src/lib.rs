//! Tally algorithms.
//!
//! A [`TallyAlgorithm`] is a pure function from a slice of entries to some
//! aggregate. A [`WeightedTallyAlgorithm`] additionally folds in a baseline of
//! previously computed weights and returns the updated weights. Neither kind
//! touches storage; persisting weights is the job of the manager layer.
//!
//! Reference strategies:
//! - [`SumTally`] sums payloads per subject.
//! - [`LatestVoteTally`] keeps only each user's most recent vote per item.
//! - [`SumWeightedTally`] keeps a running per-subject sum with a watermark.

pub mod algorithm;
pub mod error;
pub mod latest;
pub mod sum;
pub mod weighted;

pub use algorithm::{MapOutput, TallyAlgorithm, WeightedTallyAlgorithm};
pub use error::TallyError;
pub use latest::LatestVoteTally;
pub use sum::SumTally;
pub use weighted::{current_standings, SubjectWeight, SumWeightedTally};
