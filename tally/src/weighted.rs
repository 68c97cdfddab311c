//! Running per-subject sums with a watermark.

use std::cmp::Ordering;
use std::collections::btree_map::Entry as Slot;
use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use upvote_types::Entry;

use crate::{TallyError, WeightedTallyAlgorithm};

/// Standing of one subject.
///
/// `weight` is the accumulated sum. `as_of` is the time of the newest entry
/// folded into it and `folded` counts how many entries carrying exactly that
/// time are included, so entries sharing a timestamp with a previous run can
/// still be told apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWeight<S, T> {
    pub subject: S,
    pub weight: i64,
    pub as_of: T,
    pub folded: u64,
}

impl<S, T> SubjectWeight<S, T> {
    /// A standing with a single entry folded in at `as_of`.
    pub fn new(subject: S, weight: i64, as_of: T) -> Self {
        Self {
            subject,
            weight,
            as_of,
            folded: 1,
        }
    }

    pub fn with_folded(mut self, folded: u64) -> Self {
        self.folded = folded;
        self
    }
}

impl<S, T: Ord> SubjectWeight<S, T> {
    fn is_newer_than(&self, other: &Self) -> bool {
        match self.as_of.cmp(&other.as_of) {
            Ordering::Greater => true,
            Ordering::Equal => self.folded >= other.folded,
            Ordering::Less => false,
        }
    }
}

/// Reduce an append-only weight table to one current row per subject,
/// sorted by subject.
///
/// The row with the greatest `(as_of, folded)` wins; on a full tie the row
/// appearing later in `rows` does.
pub fn current_standings<S, T>(rows: Vec<SubjectWeight<S, T>>) -> Vec<SubjectWeight<S, T>>
where
    S: Ord + Clone,
    T: Ord,
{
    reduce(rows).into_values().collect()
}

fn reduce<S, T>(rows: Vec<SubjectWeight<S, T>>) -> BTreeMap<S, SubjectWeight<S, T>>
where
    S: Ord + Clone,
    T: Ord,
{
    let mut standings: BTreeMap<S, SubjectWeight<S, T>> = BTreeMap::new();
    for row in rows {
        match standings.entry(row.subject.clone()) {
            Slot::Vacant(slot) => {
                slot.insert(row);
            }
            Slot::Occupied(mut slot) => {
                if row.is_newer_than(slot.get()) {
                    slot.insert(row);
                }
            }
        }
    }
    standings
}

/// Weighted sum keyed by subject.
///
/// The baseline is reduced with [`current_standings`]. For each subject,
/// entries older than its `as_of` are already folded in and skipped, as are
/// the first `folded` entries carrying exactly `as_of`; everything else is
/// added. Entries must be passed in the order they were recorded, with
/// non-decreasing times per subject, which is what an insertion-ordered
/// table returns. Feeding the full history on every run then never double
/// counts, and an empty baseline recomputes standings from scratch.
///
/// Only subjects that took in at least one entry are returned, sorted by
/// subject. An empty result means nothing changed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumWeightedTally;

struct Watermark<'a, T> {
    as_of: &'a T,
    to_skip: u64,
}

impl<E> WeightedTallyAlgorithm<E, SubjectWeight<E::Subject, E::Time>> for SumWeightedTally
where
    E: Entry,
    E::Subject: Ord + Clone + Debug,
    E::Payload: Copy + Into<i64>,
    E::Time: Ord + Clone,
{
    fn execute_weighted(
        &self,
        entries: &[E],
        baseline: Vec<SubjectWeight<E::Subject, E::Time>>,
    ) -> Result<Vec<SubjectWeight<E::Subject, E::Time>>, TallyError> {
        let baseline = reduce(baseline);
        let mut watermarks: BTreeMap<&E::Subject, Watermark<'_, E::Time>> = baseline
            .iter()
            .map(|(subject, row)| {
                let mark = Watermark {
                    as_of: &row.as_of,
                    to_skip: row.folded,
                };
                (subject, mark)
            })
            .collect();

        let mut updated: BTreeMap<E::Subject, SubjectWeight<E::Subject, E::Time>> =
            BTreeMap::new();
        for entry in entries {
            if let Some(mark) = watermarks.get_mut(entry.subject()) {
                match entry.time().cmp(mark.as_of) {
                    Ordering::Less => continue,
                    Ordering::Equal if mark.to_skip > 0 => {
                        mark.to_skip -= 1;
                        continue;
                    }
                    _ => {}
                }
            }

            let delta: i64 = (*entry.payload()).into();
            let row = match updated.entry(entry.subject().clone()) {
                Slot::Occupied(slot) => slot.into_mut(),
                Slot::Vacant(slot) => match baseline.get(entry.subject()) {
                    Some(prior) => slot.insert(prior.clone()),
                    None => {
                        let fresh = SubjectWeight::new(entry.subject().clone(), delta, entry.time().clone());
                        slot.insert(fresh);
                        continue;
                    }
                },
            };

            row.weight = row
                .weight
                .checked_add(delta)
                .ok_or_else(|| TallyError::overflow(entry.subject()))?;
            match entry.time().cmp(&row.as_of) {
                Ordering::Greater => {
                    row.as_of = entry.time().clone();
                    row.folded = 1;
                }
                Ordering::Equal => row.folded += 1,
                Ordering::Less => {}
            }
        }

        Ok(updated.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upvote_types::{Reputation, Timestamp};

    type Rep = Reputation<&'static str, i64, Timestamp>;
    type Weight = SubjectWeight<&'static str, Timestamp>;

    fn rep(user: &'static str, value: i64, t: u64) -> Rep {
        Reputation::new(user, value, Timestamp::new(t))
    }

    fn weight(user: &'static str, value: i64, t: u64) -> Weight {
        SubjectWeight::new(user, value, Timestamp::new(t))
    }

    #[test]
    fn empty_baseline_sums_entries() {
        let entries = vec![rep("a", 10, 1), rep("a", -3, 2)];
        let updated = SumWeightedTally.execute_weighted(&entries, Vec::new()).unwrap();
        assert_eq!(updated, vec![weight("a", 7, 2)]);
    }

    #[test]
    fn entries_at_or_before_watermark_are_skipped() {
        let entries = vec![rep("a", 10, 1), rep("a", -3, 2), rep("a", 5, 3)];
        let updated = SumWeightedTally
            .execute_weighted(&entries, vec![weight("a", 7, 2)])
            .unwrap();
        assert_eq!(updated, vec![weight("a", 12, 3)]);
    }

    #[test]
    fn same_time_entries_recorded_after_a_run_are_added() {
        let first = SumWeightedTally
            .execute_weighted(&[rep("a", 10, 100)], Vec::new())
            .unwrap();
        assert_eq!(first, vec![weight("a", 10, 100)]);

        let history = [rep("a", 10, 100), rep("a", 5, 100), rep("a", 1, 101)];
        let second = SumWeightedTally
            .execute_weighted(&history, first.clone())
            .unwrap();
        assert_eq!(second, vec![weight("a", 16, 101)]);

        let scratch = SumWeightedTally.execute_weighted(&history, Vec::new()).unwrap();
        assert_eq!(current_standings([first, second].concat()), scratch);
    }

    #[test]
    fn folded_counts_entries_sharing_the_newest_time() {
        let history = [rep("a", 10, 100), rep("a", 5, 100)];
        let updated = SumWeightedTally
            .execute_weighted(&history, vec![weight("a", 10, 100)])
            .unwrap();
        assert_eq!(updated, vec![weight("a", 15, 100).with_folded(2)]);

        let replay = SumWeightedTally.execute_weighted(&history, updated).unwrap();
        assert!(replay.is_empty());
    }

    #[test]
    fn newest_baseline_row_wins() {
        let baseline = vec![weight("a", 7, 2), weight("a", 1, 1)];
        let updated = SumWeightedTally
            .execute_weighted(&[rep("a", 1, 3)], baseline)
            .unwrap();
        assert_eq!(updated, vec![weight("a", 8, 3)]);
    }

    #[test]
    fn only_changed_subjects_are_returned_sorted() {
        let entries = vec![rep("c", 2, 5), rep("a", 1, 5), rep("b", 9, 1)];
        let updated = SumWeightedTally
            .execute_weighted(&entries, vec![weight("b", 4, 1)])
            .unwrap();
        assert_eq!(updated, vec![weight("a", 1, 5), weight("c", 2, 5)]);
    }

    #[test]
    fn current_standings_keeps_the_newest_row_per_subject() {
        let rows = vec![
            weight("b", 4, 1),
            weight("a", 7, 2),
            weight("a", 9, 2).with_folded(2),
            weight("a", 1, 1),
        ];
        assert_eq!(
            current_standings(rows),
            vec![weight("a", 9, 2).with_folded(2), weight("b", 4, 1)]
        );
    }

    #[test]
    fn overflow_is_reported() {
        let entries = vec![rep("a", 1, 2)];
        let err = SumWeightedTally
            .execute_weighted(&entries, vec![weight("a", i64::MAX, 1)])
            .unwrap_err();
        assert!(matches!(err, TallyError::Overflow { .. }));
    }
}
