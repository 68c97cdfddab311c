//! Subcommand execution against an LMDB data directory.
//!
//! Everything here blocks on storage and is meant to run on a blocking
//! thread.

use std::sync::Arc;

use upvote_manager::{
    run_or_translate, Responder, ReputationManager, StoreReputationManager, StoreVoteManager,
    StoredWeightedTally, VoteManager,
};
use upvote_store::GetStore;
use upvote_store_lmdb::{check_integrity, LmdbEnvironment, LmdbError, LmdbTable};
use upvote_tally::{
    current_standings, LatestVoteTally, MapOutput, SumTally, SumWeightedTally, TallyAlgorithm,
};
use upvote_types::{Reputation, Timestamp, Vote};

use crate::response::{CliResponder, Response, Standing};

pub type StoredVote = Vote<String, String, i64, Timestamp>;
pub type StoredReputation = Reputation<String, i64, Timestamp>;

pub const VOTES_TABLE: &str = "votes";
pub const REPUTATION_TABLE: &str = "reputation";
pub const STANDINGS_TABLE: &str = "standings";
pub const TABLES: [&str; 3] = [VOTES_TABLE, REPUTATION_TABLE, STANDINGS_TABLE];

/// A storage-level action, already resolved from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Vote { user: String, item: String, vote: i64 },
    Reputation { user: String, value: i64 },
    Tally { latest: bool },
    Standings,
    Check,
}

/// The tables of one data directory.
pub struct Tables {
    env: LmdbEnvironment,
    votes: Arc<LmdbTable<StoredVote>>,
    reputation: Arc<LmdbTable<StoredReputation>>,
    standings: Arc<LmdbTable<Standing>>,
}

impl Tables {
    pub fn open(env: LmdbEnvironment) -> Result<Self, LmdbError> {
        Ok(Self {
            votes: Arc::new(env.table(VOTES_TABLE)?),
            reputation: Arc::new(env.table(REPUTATION_TABLE)?),
            standings: Arc::new(env.table(STANDINGS_TABLE)?),
            env,
        })
    }

    /// Run `action`, stamping new entries with `now`.
    pub fn execute(&self, action: Action, now: Timestamp) -> Result<Response, LmdbError> {
        tracing::debug!(?action, %now, "executing");
        let response = match action {
            Action::Vote { user, item, vote } => self
                .vote_manager(SumTally)
                .cast_vote(Vote::new(user, item, vote, now)),
            Action::Reputation { user, value } => {
                StoreReputationManager::new(
                    Arc::clone(&self.reputation),
                    |entry: StoredReputation| entry,
                    CliResponder,
                )
                .set_user_reputation(Reputation::new(user, value, now))
            }
            Action::Tally { latest: false } => self.vote_manager(SumTally).tally(),
            Action::Tally { latest: true } => self.vote_manager(LatestVoteTally).tally(),
            Action::Standings => self.standings(),
            Action::Check => check_integrity(&self.env, &TABLES)?.into(),
        };
        Ok(response)
    }

    fn vote_manager<A>(
        &self,
        algorithm: A,
    ) -> impl VoteManager<StoredVote, Response = Response> + '_
    where
        A: TallyAlgorithm<StoredVote, Output = std::collections::BTreeMap<String, i64>> + 'static,
    {
        StoreVoteManager::new(
            Arc::clone(&self.votes),
            |entry: StoredVote| entry,
            MapOutput::new(algorithm, Response::totals),
            CliResponder,
        )
    }

    /// Fold the reputation history into the standings table, then answer
    /// with each user's current standing.
    fn standings(&self) -> Response {
        let weighted =
            StoredWeightedTally::new(Arc::clone(&self.standings), CliResponder, SumWeightedTally);
        let updated = run_or_translate(
            || {
                let history = self.reputation.get_all()?;
                Ok(weighted.execute(&history)?)
            },
            |response| response,
            |fault| CliResponder.fault(fault),
        );
        if updated != Response::Persisted {
            return updated;
        }

        run_or_translate(
            || Ok(current_standings(self.standings.get_all()?)),
            |standings| Response::Standings { standings },
            |fault| CliResponder.fault(fault),
        )
    }
}
