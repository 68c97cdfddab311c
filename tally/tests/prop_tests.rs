use proptest::prelude::*;

use upvote_tally::{
    current_standings, SumTally, SumWeightedTally, TallyAlgorithm, WeightedTallyAlgorithm,
};
use upvote_types::{Reputation, Timestamp, Vote};

type TestVote = Vote<u8, u8, i8, Timestamp>;
type TestRep = Reputation<u8, i32, Timestamp>;

fn votes() -> impl Strategy<Value = Vec<TestVote>> {
    prop::collection::vec(
        (0u8..8, 0u8..4, -1i8..=1, 0u64..100)
            .prop_map(|(user, item, vote, t)| Vote::new(user, item, vote, Timestamp::new(t))),
        0..64,
    )
}

fn reps() -> impl Strategy<Value = Vec<TestRep>> {
    prop::collection::vec(
        (0u8..4, -1000i32..1000, 0u64..100)
            .prop_map(|(user, rep, t)| Reputation::new(user, rep, Timestamp::new(t))),
        0..64,
    )
}

proptest! {
    /// Running the same sum twice over the same input gives the same totals.
    #[test]
    fn sum_is_deterministic(entries in votes()) {
        let first = SumTally.execute(&entries).unwrap();
        let second = SumTally.execute(&entries).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Sum totals do not depend on entry order.
    #[test]
    fn sum_ignores_order(entries in votes(), split in 0usize..64) {
        let mut rotated = entries.clone();
        if !rotated.is_empty() {
            let mid = split % rotated.len();
            rotated.rotate_left(mid);
        }
        rotated.reverse();
        prop_assert_eq!(SumTally.execute(&entries).unwrap(), SumTally.execute(&rotated).unwrap());
    }

    /// Per-subject totals add up to the sum of all payloads.
    #[test]
    fn sum_preserves_grand_total(entries in votes()) {
        let totals = SumTally.execute(&entries).unwrap();
        let expected: i64 = entries.iter().map(|v| i64::from(*upvote_types::VoteEntry::vote(v))).sum();
        prop_assert_eq!(totals.values().sum::<i64>(), expected);
    }

    /// Applying a weighted tally on top of its own output with the same
    /// entries changes nothing.
    #[test]
    fn weighted_is_stable_on_replay(entries in reps()) {
        let once = SumWeightedTally.execute_weighted(&entries, Vec::new()).unwrap();
        let twice = SumWeightedTally.execute_weighted(&entries, once).unwrap();
        prop_assert!(twice.is_empty());
    }

    /// Folding a time-ordered history in two runs, split anywhere (including
    /// inside a group of equal timestamps), matches a single run.
    #[test]
    fn weighted_split_runs_match_one_run(mut entries in reps(), split in 0usize..64) {
        entries.sort_by_key(|entry| *upvote_types::TimestampEntry::time(entry));
        let split = split.min(entries.len());

        let first = SumWeightedTally.execute_weighted(&entries[..split], Vec::new()).unwrap();
        let second = SumWeightedTally.execute_weighted(&entries, first.clone()).unwrap();
        let scratch = SumWeightedTally.execute_weighted(&entries, Vec::new()).unwrap();
        prop_assert_eq!(current_standings([first, second].concat()), scratch);
    }
}
