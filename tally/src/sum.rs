//! Plain per-subject sum.

use std::collections::BTreeMap;
use std::fmt::Debug;

use upvote_types::Entry;

use crate::{TallyAlgorithm, TallyError};

/// Sums every entry's payload per subject.
///
/// Order-independent: any permutation of the same entries yields the same
/// totals. Subjects with no entries are absent from the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumTally;

impl<E> TallyAlgorithm<E> for SumTally
where
    E: Entry,
    E::Subject: Ord + Clone + Debug,
    E::Payload: Copy + Into<i64>,
{
    type Output = BTreeMap<E::Subject, i64>;

    fn execute(&self, entries: &[E]) -> Result<Self::Output, TallyError> {
        let mut totals = BTreeMap::new();
        for entry in entries {
            let total = totals.entry(entry.subject().clone()).or_insert(0i64);
            *total = total
                .checked_add((*entry.payload()).into())
                .ok_or_else(|| TallyError::overflow(entry.subject()))?;
        }
        Ok(totals)
    }
}
