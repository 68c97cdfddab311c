//! Vote and reputation entries.
//!
//! The role traits ([`UserEntry`], [`TimestampEntry`], [`VoteEntry`],
//! [`ReputationEntry`]) let callers bring their own record types. [`Entry`]
//! is the uniform `{subject, payload, time}` view the tally algorithms work
//! on: for a vote the subject is the item and the payload the vote, for a
//! reputation entry the subject is the user and the payload the reputation.
//!
//! [`Vote`] and [`Reputation`] are ready-made implementations. Their fields
//! are private and there are no setters; an entry is superseded by recording
//! a newer one, never edited.

use serde::{Deserialize, Serialize};

/// An entry that carries the moment it was observed.
pub trait TimestampEntry {
    type Time;

    fn time(&self) -> &Self::Time;
}

/// An entry attributed to a user.
pub trait UserEntry {
    type User;

    fn user(&self) -> &Self::User;
}

/// `user` cast `vote` on `item` at `time`.
pub trait VoteEntry: UserEntry + TimestampEntry {
    type Item;
    type Vote;

    fn item(&self) -> &Self::Item;
    fn vote(&self) -> &Self::Vote;
}

/// `user` was assigned `reputation` at `time`.
pub trait ReputationEntry: UserEntry + TimestampEntry {
    type Reputation;

    fn reputation(&self) -> &Self::Reputation;
}

/// Uniform view over any entry: what it is about, what it says, and when.
pub trait Entry: TimestampEntry {
    type Subject;
    type Payload;

    fn subject(&self) -> &Self::Subject;
    fn payload(&self) -> &Self::Payload;
}

/// A single vote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vote<U, I, V, T> {
    user: U,
    item: I,
    vote: V,
    time: T,
}

impl<U, I, V, T> Vote<U, I, V, T> {
    pub fn new(user: U, item: I, vote: V, time: T) -> Self {
        Self {
            user,
            item,
            vote,
            time,
        }
    }

    /// Consume the entry, returning `(user, item, vote, time)`.
    pub fn into_parts(self) -> (U, I, V, T) {
        (self.user, self.item, self.vote, self.time)
    }
}

impl<U, I, V, T> UserEntry for Vote<U, I, V, T> {
    type User = U;

    fn user(&self) -> &U {
        &self.user
    }
}

impl<U, I, V, T> TimestampEntry for Vote<U, I, V, T> {
    type Time = T;

    fn time(&self) -> &T {
        &self.time
    }
}

impl<U, I, V, T> VoteEntry for Vote<U, I, V, T> {
    type Item = I;
    type Vote = V;

    fn item(&self) -> &I {
        &self.item
    }

    fn vote(&self) -> &V {
        &self.vote
    }
}

impl<U, I, V, T> Entry for Vote<U, I, V, T> {
    type Subject = I;
    type Payload = V;

    fn subject(&self) -> &I {
        &self.item
    }

    fn payload(&self) -> &V {
        &self.vote
    }
}

/// A single reputation assignment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reputation<U, R, T> {
    user: U,
    reputation: R,
    time: T,
}

impl<U, R, T> Reputation<U, R, T> {
    pub fn new(user: U, reputation: R, time: T) -> Self {
        Self {
            user,
            reputation,
            time,
        }
    }

    /// Consume the entry, returning `(user, reputation, time)`.
    pub fn into_parts(self) -> (U, R, T) {
        (self.user, self.reputation, self.time)
    }
}

impl<U, R, T> UserEntry for Reputation<U, R, T> {
    type User = U;

    fn user(&self) -> &U {
        &self.user
    }
}

impl<U, R, T> TimestampEntry for Reputation<U, R, T> {
    type Time = T;

    fn time(&self) -> &T {
        &self.time
    }
}

impl<U, R, T> ReputationEntry for Reputation<U, R, T> {
    type Reputation = R;

    fn reputation(&self) -> &R {
        &self.reputation
    }
}

impl<U, R, T> Entry for Reputation<U, R, T> {
    type Subject = U;
    type Payload = R;

    fn subject(&self) -> &U {
        &self.user
    }

    fn payload(&self) -> &R {
        &self.reputation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    #[test]
    fn vote_subject_is_the_item() {
        let vote = Vote::new("alice", "post-1", 1i8, Timestamp::new(7));
        assert_eq!(*vote.subject(), "post-1");
        assert_eq!(*vote.payload(), 1);
        assert_eq!(*vote.user(), "alice");
        assert_eq!(vote.time().as_secs(), 7);
    }

    #[test]
    fn reputation_subject_is_the_user() {
        let rep = Reputation::new("bob", -3i64, Timestamp::new(2));
        assert_eq!(*rep.subject(), "bob");
        assert_eq!(*rep.reputation(), -3);
        assert_eq!(rep.payload(), rep.reputation());
    }

    #[test]
    fn into_parts_returns_fields_in_order() {
        let vote = Vote::new(1u32, 2u32, -1i64, 3u64);
        assert_eq!(vote.into_parts(), (1, 2, -1, 3));
    }
}
