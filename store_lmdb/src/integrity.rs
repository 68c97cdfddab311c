//! LMDB data directory checks.
//!
//! Run before serving requests to detect a damaged or mistyped data
//! directory early.

use std::path::Path;

use heed::types::Bytes;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub tables_checked: u32,
    pub total_rows: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Count the rows of every table in `tables` that exists.
///
/// Missing tables are fine (nothing was written yet). Read failures are
/// recorded in the report rather than returned as an error.
pub fn check_integrity(
    env: &LmdbEnvironment,
    tables: &[&str],
) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env().read_txn()?;

    for &name in tables {
        match env.env().open_database::<Bytes, Bytes>(&rtxn, Some(name)) {
            Ok(Some(db)) => {
                report.tables_checked += 1;
                match db.len(&rtxn) {
                    Ok(rows) => report.total_rows += rows,
                    Err(e) => report.errors.push(format!("failed to read table '{name}': {e}")),
                }
            }
            Ok(None) => {}
            Err(e) => report.errors.push(format!("failed to open table '{name}': {e}")),
        }
    }

    Ok(report)
}

/// Check that `path` looks like an LMDB data directory before opening it.
///
/// A path that does not exist yet is accepted (fresh start). An existing
/// directory without `data.mdb` is rejected.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(format!("{} is not a directory", path.display()));
    }
    if !path.join("data.mdb").exists() {
        return Err(format!(
            "directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
