use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("tally overflowed while accumulating {subject}")]
    Overflow { subject: String },

    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

impl TallyError {
    pub(crate) fn overflow(subject: &impl std::fmt::Debug) -> Self {
        Self::Overflow {
            subject: format!("{subject:?}"),
        }
    }
}
