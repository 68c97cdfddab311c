//! Shared utilities for the upvote binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
