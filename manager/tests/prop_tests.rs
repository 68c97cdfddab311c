//! Property tests for the manager contract, run against the in-memory table
//! so faults can be injected at every step.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use upvote_manager::{
    persist_all, BaselinePolicy, Fault, FaultKind, FnResponder, InputManager, StoreVoteManager,
    StoredWeightedTally, VoteManager,
};
use upvote_nullables::{InjectedFault, NullClock, NullTable};
use upvote_store::GetStore;
use upvote_tally::{MapOutput, SubjectWeight, SumTally, SumWeightedTally, TallyAlgorithm};
use upvote_types::{Reputation, Timestamp, Vote};

type TestVote = Vote<u8, u8, i64, Timestamp>;
type Weight = SubjectWeight<u8, Timestamp>;

#[derive(Debug, PartialEq)]
enum Reply {
    Stored(u64),
    Persisted,
    Totals(BTreeMap<u8, i64>),
    Failed(FaultKind),
}

fn replies() -> FnResponder<Reply> {
    FnResponder::new(
        |id| Reply::Stored(id.get()),
        || Reply::Persisted,
        |fault: Fault| Reply::Failed(fault.kind()),
    )
}

fn manager(
    table: &Arc<NullTable<TestVote>>,
) -> impl VoteManager<TestVote, Response = Reply> {
    StoreVoteManager::new(
        Arc::clone(table),
        |entry: TestVote| entry,
        MapOutput::new(SumTally, Reply::Totals),
        replies(),
    )
}

fn arb_votes() -> impl Strategy<Value = Vec<(u8, u8, i64)>> {
    prop::collection::vec((0u8..8, 0u8..4, -1i64..=1), 0..40)
}

fn arb_fault() -> impl Strategy<Value = InjectedFault> {
    prop_oneof![Just(InjectedFault::Unavailable), Just(InjectedFault::Constraint)]
}

proptest! {
    /// Every cast vote shows up in the next tally.
    #[test]
    fn round_trip(votes in arb_votes()) {
        let table = Arc::new(NullTable::new());
        let manager = manager(&table);
        let clock = NullClock::default();

        let mut expected: BTreeMap<u8, i64> = BTreeMap::new();
        for (user, item, value) in votes {
            let reply = manager.cast_vote(Vote::new(user, item, value, clock.tick()));
            prop_assert!(matches!(reply, Reply::Stored(_)));
            *expected.entry(item).or_default() += value;
        }
        prop_assert_eq!(manager.tally(), Reply::Totals(expected));
    }

    /// A failed insert answers through the fault path and leaves no row.
    #[test]
    fn fault_isolation(votes in arb_votes(), fault in arb_fault()) {
        let table = Arc::new(NullTable::new());
        let manager = manager(&table);
        table.fail_insert(Some(fault));

        for (user, item, value) in votes {
            let reply = manager.put_entry(Vote::new(user, item, value, Timestamp::EPOCH));
            prop_assert!(matches!(reply, Reply::Failed(_)));
        }
        prop_assert!(table.get_all().unwrap().is_empty());
    }

    /// A batch that fails partway is either fully visible or not at all.
    #[test]
    fn batch_atomicity(
        existing in prop::collection::vec(any::<u32>(), 0..10),
        batch in prop::collection::vec(any::<u32>(), 1..20),
        written in 0usize..25,
    ) {
        let table = NullTable::with_rows(existing.clone());
        table.fail_insert_all(Some(InjectedFault::Unavailable), written);

        let reply = persist_all(&table, &batch, &replies());
        prop_assert_eq!(reply, Reply::Failed(FaultKind::Transient));
        prop_assert_eq!(table.get_all().unwrap(), existing);
    }

    /// The weighted path keeps going when the baseline read fails.
    #[test]
    fn weighted_soft_recovery(values in prop::collection::vec(-100i64..100, 1..20)) {
        let weights = Arc::new(NullTable::<Weight>::new());
        weights.fail_get_all(Some(InjectedFault::Unavailable));
        let tally = StoredWeightedTally::new(Arc::clone(&weights), replies(), SumWeightedTally);

        let entries: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(t, value)| Reputation::new(0u8, *value, Timestamp::new(t as u64 + 1)))
            .collect();
        prop_assert_eq!(tally.execute(&entries).unwrap(), Reply::Persisted);
        prop_assert_eq!(weights.insert_all_calls(), 1);
        prop_assert_eq!(weights.rows()[0].weight, values.iter().sum::<i64>());
    }

    /// Repeated reads with no writes in between are equal.
    #[test]
    fn idempotent_reads(votes in arb_votes()) {
        let table = Arc::new(NullTable::new());
        let manager = manager(&table);
        for (user, item, value) in votes {
            manager.cast_vote(Vote::new(user, item, value, Timestamp::EPOCH));
        }
        prop_assert_eq!(table.get_all().unwrap(), table.get_all().unwrap());
        prop_assert_eq!(manager.tally(), manager.tally());
    }
}

#[test]
fn sum_tally_is_stable_across_invocations() {
    let entries = vec![
        Vote::new(1u8, 7u8, 1i64, Timestamp::new(1)),
        Vote::new(2, 7, -1, Timestamp::new(2)),
        Vote::new(3, 7, 1, Timestamp::new(3)),
    ];
    for _ in 0..10 {
        assert_eq!(
            SumTally.execute(&entries).unwrap(),
            BTreeMap::from([(7u8, 1)])
        );
    }
}

#[test]
fn fail_on_fault_policy_skips_the_write() {
    let weights = Arc::new(NullTable::<Weight>::new());
    weights.fail_get_all(Some(InjectedFault::Unavailable));
    let tally = StoredWeightedTally::new(Arc::clone(&weights), replies(), SumWeightedTally)
        .with_policy(BaselinePolicy::FailOnFault);

    let entries = [Reputation::new(0u8, 10i64, Timestamp::new(1))];
    assert_eq!(
        tally.execute(&entries).unwrap(),
        Reply::Failed(FaultKind::Transient)
    );
    assert_eq!(weights.insert_all_calls(), 0);
}

#[test]
fn reputation_scenario_with_a_failing_baseline_read() {
    let weights = Arc::new(NullTable::<Weight>::new());
    let tally = StoredWeightedTally::new(Arc::clone(&weights), replies(), SumWeightedTally);
    let history = vec![
        Reputation::new(0u8, 10i64, Timestamp::new(1)),
        Reputation::new(0u8, -3i64, Timestamp::new(2)),
    ];

    assert_eq!(tally.execute(&history).unwrap(), Reply::Persisted);
    assert_eq!(weights.rows(), vec![SubjectWeight::new(0u8, 7, Timestamp::new(2))]);

    weights.fail_get_all(Some(InjectedFault::Unavailable));
    let next = vec![Reputation::new(0u8, 4i64, Timestamp::new(3))];
    assert_eq!(tally.execute(&next).unwrap(), Reply::Persisted);
    assert_eq!(
        weights.rows().last(),
        Some(&SubjectWeight::new(0u8, 4, Timestamp::new(3)))
    );
}
