//! Storage boundary for upvote tables.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The managers and the weighted tally depend only on the traits.

pub mod error;
pub mod table;

pub use error::StoreError;
pub use table::{GetStore, InsertStore, RecordId, Table};
