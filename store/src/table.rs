//! Table storage traits.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier handed back for a single inserted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Write side of a table.
///
/// Neither operation is idempotent: inserting the same record twice stores
/// two rows with distinct ids.
pub trait InsertStore<R> {
    /// Store one record and return its id.
    fn insert(&self, record: &R) -> Result<RecordId, StoreError>;

    /// Store a batch of records.
    ///
    /// All-or-nothing: when this returns `Err`, none of `records` may be
    /// visible to a later [`GetStore::get_all`]. The backend provides the
    /// atomicity, usually with a single write transaction.
    fn insert_all(&self, records: &[R]) -> Result<(), StoreError>;
}

/// Read side of a table.
pub trait GetStore<R> {
    /// Every durable record in the table.
    ///
    /// Backends document their ordering; callers must not assume one.
    fn get_all(&self) -> Result<Vec<R>, StoreError>;
}

/// A table that can be both written and read.
pub trait Table<R>: InsertStore<R> + GetStore<R> {}

impl<R, T> Table<R> for T where T: InsertStore<R> + GetStore<R> + ?Sized {}
