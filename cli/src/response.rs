//! What the binary prints.

use std::collections::BTreeMap;

use serde::Serialize;
use upvote_manager::{Fault, FaultKind, Responder};
use upvote_store::RecordId;
use upvote_store_lmdb::IntegrityReport;
use upvote_tally::SubjectWeight;
use upvote_types::Timestamp;

/// A user's current reputation standing.
pub type Standing = SubjectWeight<String, Timestamp>;

/// One JSON object per invocation, tagged by `status`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Inserted { id: u64 },
    Persisted,
    Totals { totals: BTreeMap<String, i64> },
    Standings { standings: Vec<Standing> },
    Integrity {
        tables_checked: u32,
        total_rows: u64,
        errors: Vec<String>,
    },
    Failed {
        kind: FaultKind,
        retryable: bool,
        message: String,
    },
}

impl Response {
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Failed { .. } => true,
            Self::Integrity { errors, .. } => !errors.is_empty(),
            _ => false,
        }
    }

    pub fn totals(totals: BTreeMap<String, i64>) -> Self {
        Self::Totals { totals }
    }
}

impl From<IntegrityReport> for Response {
    fn from(report: IntegrityReport) -> Self {
        Self::Integrity {
            tables_checked: report.tables_checked,
            total_rows: report.total_rows,
            errors: report.errors,
        }
    }
}

/// Builds [`Response`]s for every manager in the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct CliResponder;

impl Responder for CliResponder {
    type Response = Response;

    fn inserted(&self, id: RecordId) -> Response {
        Response::Inserted { id: id.get() }
    }

    fn persisted(&self) -> Response {
        Response::Persisted
    }

    fn fault(&self, fault: Fault) -> Response {
        Response::Failed {
            kind: fault.kind(),
            retryable: fault.is_retryable(),
            message: fault.to_string(),
        }
    }
}
