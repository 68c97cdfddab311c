//! Manager traits.

use upvote_types::{ReputationEntry, VoteEntry};

/// Accepts entries and answers every call with exactly one response.
pub trait InputManager<E> {
    type Response;

    /// Record `entry`. This is the only way entries enter a manager.
    fn put_entry(&self, entry: E) -> Self::Response;
}

/// An input manager for votes that can also produce a tally.
pub trait VoteManager<E: VoteEntry>: InputManager<E> {
    /// Alias of [`InputManager::put_entry`].
    fn cast_vote(&self, entry: E) -> Self::Response {
        self.put_entry(entry)
    }

    /// Tally every vote recorded so far.
    fn tally(&self) -> Self::Response;
}

/// An input manager for reputation assignments.
pub trait ReputationManager<E: ReputationEntry>: InputManager<E> {
    /// Alias of [`InputManager::put_entry`].
    fn set_user_reputation(&self, entry: E) -> Self::Response {
        self.put_entry(entry)
    }
}
