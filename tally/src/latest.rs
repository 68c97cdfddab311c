//! Sum of each user's latest vote.

use std::collections::btree_map::Entry as Slot;
use std::collections::BTreeMap;
use std::fmt::Debug;

use upvote_types::VoteEntry;

use crate::{TallyAlgorithm, TallyError};

/// Sums, per item, only the most recent vote of every user.
///
/// A user who votes on the same item several times is counted once, with
/// the vote carrying the greatest timestamp. Equal timestamps resolve to the
/// entry that appears later in the input slice, so the result depends on
/// input order only for same-time revotes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatestVoteTally;

impl<E> TallyAlgorithm<E> for LatestVoteTally
where
    E: VoteEntry,
    E::User: Ord + Clone,
    E::Item: Ord + Clone + Debug,
    E::Vote: Copy + Into<i64>,
    E::Time: Ord,
{
    type Output = BTreeMap<E::Item, i64>;

    fn execute(&self, entries: &[E]) -> Result<Self::Output, TallyError> {
        let mut latest: BTreeMap<(E::Item, E::User), &E> = BTreeMap::new();
        for entry in entries {
            match latest.entry((entry.item().clone(), entry.user().clone())) {
                Slot::Vacant(slot) => {
                    slot.insert(entry);
                }
                Slot::Occupied(mut slot) => {
                    if entry.time() >= slot.get().time() {
                        slot.insert(entry);
                    }
                }
            }
        }

        let mut totals = BTreeMap::new();
        for ((item, _user), entry) in latest {
            let total = totals.entry(item).or_insert(0i64);
            *total = total
                .checked_add((*entry.vote()).into())
                .ok_or_else(|| TallyError::overflow(entry.item()))?;
        }
        Ok(totals)
    }
}
