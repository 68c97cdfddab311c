use heed::MdbError;
use thiserror::Error;
use upvote_store::StoreError;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        let message = e.to_string();
        match e {
            LmdbError::Io(_) | LmdbError::Heed(heed::Error::Io(_)) => {
                StoreError::Unavailable(message)
            }
            LmdbError::Heed(heed::Error::Mdb(
                MdbError::MapFull | MdbError::ReadersFull | MdbError::TxnFull | MdbError::DbsFull,
            )) => StoreError::Unavailable(message),
            LmdbError::Heed(heed::Error::Mdb(MdbError::KeyExist)) => StoreError::Constraint(message),
            LmdbError::Heed(heed::Error::Mdb(MdbError::Corrupted | MdbError::PageNotFound)) => {
                StoreError::Corruption(message)
            }
            LmdbError::Heed(heed::Error::Encoding(_) | heed::Error::Decoding(_))
            | LmdbError::Serialization(_) => StoreError::Serialization(message),
            LmdbError::Heed(_) => StoreError::Backend(message),
        }
    }
}
