use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The engine could not be reached or ran out of capacity. Retrying may succeed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write violated a constraint of the table.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the same call may succeed later without the caller changing anything.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Backend(_))
    }
}
