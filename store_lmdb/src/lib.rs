//! LMDB storage backend for upvote tables.
//!
//! Implements the table traits from `upvote-store` using the `heed` LMDB
//! bindings. Each table is one named LMDB database within a single
//! environment. Rows are keyed by a big-endian `u64` sequence number, so
//! `get_all` returns rows in insertion order, and values are
//! `bincode`-encoded.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod table;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use table::LmdbTable;
