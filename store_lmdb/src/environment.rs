//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::{Env, EnvOpenOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{LmdbError, LmdbTable};

/// Wraps the LMDB environment that every table of a data directory shares.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// `max_dbs` bounds the number of tables; `map_size` is the maximum
    /// size of the data file in bytes and must be a multiple of the OS page
    /// size.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        let mut options = EnvOpenOptions::new();
        options.max_dbs(max_dbs).map_size(map_size);
        // SAFETY: the environment is opened once per path by this process and
        // the directory is not shared with any other writer.
        let env = unsafe { options.open(path)? };
        tracing::info!(path = %path.display(), max_dbs, map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
        })
    }

    /// Open the table `name`, creating it on first use.
    pub fn table<R>(&self, name: &str) -> Result<LmdbTable<R>, LmdbError>
    where
        R: Serialize + DeserializeOwned,
    {
        LmdbTable::create(Arc::clone(&self.env), name)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
