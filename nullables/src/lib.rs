//! Nullable infrastructure for deterministic testing.
//!
//! Storage and time are abstracted behind traits or plain values elsewhere
//! in the workspace. This crate provides test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be told to fail on demand
//! - Never touch the filesystem
//!
//! Usage: swap an LMDB table for a [`NullTable`] in tests.

pub mod clock;
pub mod table;

pub use clock::NullClock;
pub use table::{InjectedFault, NullTable};
