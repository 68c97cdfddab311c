//! LMDB implementation of the table traits.

use std::marker::PhantomData;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use upvote_store::{GetStore, InsertStore, RecordId, StoreError};

use crate::LmdbError;

/// One table: a named LMDB database of `seq_be_u64(8)` → `bincode(R)`.
pub struct LmdbTable<R> {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
    name: String,
    _record: PhantomData<fn() -> R>,
}

fn decode_key(key: &[u8]) -> Result<u64, LmdbError> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        LmdbError::Serialization(format!("invalid record key length {}", key.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

impl<R> LmdbTable<R> {
    pub(crate) fn create(env: Arc<Env>, name: &str) -> Result<Self, LmdbError> {
        let mut wtxn = env.write_txn()?;
        let db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(name))?;
        wtxn.commit()?;
        Ok(Self {
            env,
            db,
            name: name.to_string(),
            _record: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Sequence number for the next row: one past the last key, or 1 for an
    /// empty table.
    fn next_seq(&self, txn: &RoTxn) -> Result<u64, LmdbError> {
        match self.db.last(txn)? {
            Some((key, _)) => Ok(decode_key(key)? + 1),
            None => Ok(1),
        }
    }
}

impl<R: Serialize> InsertStore<R> for LmdbTable<R> {
    fn insert(&self, record: &R) -> Result<RecordId, StoreError> {
        let value = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = self.next_seq(&wtxn)?;
        self.db
            .put(&mut wtxn, &seq.to_be_bytes(), value.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(table = %self.name, seq, "inserted row");
        Ok(RecordId::new(seq))
    }

    /// Writes the whole batch in one write transaction. Any error drops the
    /// transaction uncommitted, which aborts it.
    fn insert_all(&self, records: &[R]) -> Result<(), StoreError> {
        let values = records
            .iter()
            .map(|record| bincode::serialize(record))
            .collect::<Result<Vec<_>, _>>()
            .map_err(LmdbError::from)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let first = self.next_seq(&wtxn)?;
        for (seq, value) in (first..).zip(&values) {
            self.db
                .put(&mut wtxn, &seq.to_be_bytes(), value.as_slice())
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(table = %self.name, first, count = values.len(), "inserted batch");
        Ok(())
    }
}

impl<R: DeserializeOwned> GetStore<R> for LmdbTable<R> {
    fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for row in iter {
            let (_, value) = row.map_err(LmdbError::from)?;
            records.push(bincode::deserialize(value).map_err(LmdbError::from)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use upvote_types::{Reputation, Timestamp, Vote};

    type TestVote = Vote<String, String, i64, Timestamp>;

    fn temp_env(map_size: usize) -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4, map_size).expect("open env");
        (dir, env)
    }

    fn vote(user: &str, value: i64, t: u64) -> TestVote {
        Vote::new(user.into(), "post".into(), value, Timestamp::new(t))
    }

    #[test]
    fn insert_assigns_increasing_ids_and_reads_back_in_order() {
        let (_dir, env) = temp_env(1 << 20);
        let table = env.table::<TestVote>("votes").unwrap();
        let first = table.insert(&vote("a", 1, 1)).unwrap();
        let second = table.insert(&vote("b", -1, 2)).unwrap();
        assert!(second > first);
        assert_eq!(
            table.get_all().unwrap(),
            vec![vote("a", 1, 1), vote("b", -1, 2)]
        );
    }

    #[test]
    fn insert_all_appends_after_existing_rows() {
        let (_dir, env) = temp_env(1 << 20);
        let table = env.table::<TestVote>("votes").unwrap();
        table.insert(&vote("a", 1, 1)).unwrap();
        table
            .insert_all(&[vote("b", 1, 2), vote("c", -1, 3)])
            .unwrap();
        assert_eq!(table.len().unwrap(), 3);
        let id = table.insert(&vote("d", 1, 4)).unwrap();
        assert_eq!(id, RecordId::new(4));
    }

    #[test]
    fn tables_are_independent() {
        let (_dir, env) = temp_env(1 << 20);
        let votes = env.table::<TestVote>("votes").unwrap();
        let reps = env
            .table::<Reputation<String, i64, Timestamp>>("reputation")
            .unwrap();
        votes.insert(&vote("a", 1, 1)).unwrap();
        assert!(reps.is_empty().unwrap());
        assert_eq!(votes.name(), "votes");
    }

    #[test]
    fn repeated_reads_are_equal() {
        let (_dir, env) = temp_env(1 << 20);
        let table = env.table::<TestVote>("votes").unwrap();
        table.insert_all(&[vote("a", 1, 1), vote("b", 1, 2)]).unwrap();
        assert_eq!(table.get_all().unwrap(), table.get_all().unwrap());
    }

    #[test]
    fn batch_that_overflows_the_map_leaves_nothing_behind() {
        let (_dir, env) = temp_env(256 * 1024);
        let table = env.table::<Vec<u8>>("blobs").unwrap();
        table.insert(&vec![1u8; 16]).unwrap();

        let batch: Vec<Vec<u8>> = (0..64).map(|i| vec![i as u8; 16 * 1024]).collect();
        let err = table.insert_all(&batch).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(table.get_all().unwrap(), vec![vec![1u8; 16]]);
    }

    #[test]
    fn rows_survive_reopening_the_environment() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 4, 1 << 20).unwrap();
            let table = env.table::<TestVote>("votes").unwrap();
            table.insert(&vote("a", 1, 1)).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 4, 1 << 20).unwrap();
        let table = env.table::<TestVote>("votes").unwrap();
        assert_eq!(table.get_all().unwrap(), vec![vote("a", 1, 1)]);
    }
}
