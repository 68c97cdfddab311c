//! Fundamental types for the upvote workspace.
//!
//! Entries are the immutable observations everything else is built from: a
//! vote cast by a user on an item, or a reputation value assigned to a user.
//! Both carry a timestamp. The field types are left generic so callers pick
//! their own user, item, vote and time representations.

pub mod entry;
pub mod time;

pub use entry::{Entry, Reputation, ReputationEntry, TimestampEntry, UserEntry, Vote, VoteEntry};
pub use time::Timestamp;
