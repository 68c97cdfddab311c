//! Nullable table: thread-safe in-memory storage with fault injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use upvote_store::{GetStore, InsertStore, RecordId, StoreError};

/// The kind of failure a [`NullTable`] reports when told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectedFault {
    /// Behaves like a lost connection.
    Unavailable,
    /// Behaves like a constraint violation.
    Constraint,
}

impl InjectedFault {
    fn to_error(self, operation: &str) -> StoreError {
        let message = format!("injected fault during {operation}");
        match self {
            Self::Unavailable => StoreError::Unavailable(message),
            Self::Constraint => StoreError::Constraint(message),
        }
    }
}

#[derive(Default)]
struct Faults {
    insert: Option<InjectedFault>,
    /// Fault plus the number of rows written before it fires.
    insert_all: Option<(InjectedFault, usize)>,
    get_all: Option<InjectedFault>,
}

/// An in-memory table for testing.
///
/// Rows are kept in insertion order and ids are sequential from 1. Faults
/// stay armed until cleared. A failing `insert_all` may be told to write a
/// prefix of the batch first; those rows are discarded before the error is
/// returned, the way an engine rolls back an aborted transaction.
pub struct NullTable<R> {
    rows: Mutex<Vec<R>>,
    faults: Mutex<Faults>,
    insert_calls: AtomicUsize,
    insert_all_calls: AtomicUsize,
    get_all_calls: AtomicUsize,
}

impl<R> NullTable<R> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            insert_calls: AtomicUsize::new(0),
            insert_all_calls: AtomicUsize::new(0),
            get_all_calls: AtomicUsize::new(0),
        }
    }

    /// Build a table that already holds `rows`.
    pub fn with_rows(rows: Vec<R>) -> Self {
        let table = Self::new();
        *table.rows.lock().unwrap() = rows;
        table
    }

    /// Make every `insert` fail with `fault`, or succeed again with `None`.
    pub fn fail_insert(&self, fault: Option<InjectedFault>) {
        self.faults.lock().unwrap().insert = fault;
    }

    /// Make every `insert_all` fail with `fault` after writing
    /// `written_before_fault` rows, which are then rolled back.
    pub fn fail_insert_all(&self, fault: Option<InjectedFault>, written_before_fault: usize) {
        self.faults.lock().unwrap().insert_all = fault.map(|f| (f, written_before_fault));
    }

    /// Make every `get_all` fail with `fault`, or succeed again with `None`.
    pub fn fail_get_all(&self, fault: Option<InjectedFault>) {
        self.faults.lock().unwrap().get_all = fault;
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn insert_all_calls(&self) -> usize {
        self.insert_all_calls.load(Ordering::SeqCst)
    }

    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }
}

impl<R: Clone> NullTable<R> {
    /// Snapshot of the rows without counting as a `get_all` call.
    pub fn rows(&self) -> Vec<R> {
        self.rows.lock().unwrap().clone()
    }
}

impl<R> Default for NullTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> InsertStore<R> for NullTable<R> {
    fn insert(&self, record: &R) -> Result<RecordId, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.faults.lock().unwrap().insert {
            return Err(fault.to_error("insert"));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(record.clone());
        Ok(RecordId::new(rows.len() as u64))
    }

    fn insert_all(&self, records: &[R]) -> Result<(), StoreError> {
        self.insert_all_calls.fetch_add(1, Ordering::SeqCst);
        let fault = self.faults.lock().unwrap().insert_all;
        let mut rows = self.rows.lock().unwrap();

        let mut staged = rows.clone();
        for (written, record) in records.iter().enumerate() {
            if let Some((fault, limit)) = fault {
                if written >= limit {
                    tracing::debug!(written, "rolling back partial batch");
                    return Err(fault.to_error("insert_all"));
                }
            }
            staged.push(record.clone());
        }
        if let Some((fault, _)) = fault {
            return Err(fault.to_error("insert_all"));
        }

        *rows = staged;
        Ok(())
    }
}

impl<R: Clone> GetStore<R> for NullTable<R> {
    fn get_all(&self) -> Result<Vec<R>, StoreError> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.faults.lock().unwrap().get_all {
            return Err(fault.to_error("get_all"));
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}
