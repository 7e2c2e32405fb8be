use serde::{Deserialize, Serialize};

use super::NewUser;

/// One candidate user produced by CSV parsing. Sent as-is as the
/// `POST /users` body; never persisted client-side.
pub type ImportRecord = NewUser;

/// Outcome tally for one import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success_count: usize,
    pub error_count: usize,
    /// CSV rows dropped for having fewer than four fields. Not part of
    /// `error_count`, which only counts failed create requests.
    pub skipped_rows: usize,
}

impl ImportResult {
    /// Number of create requests issued.
    pub fn attempted(&self) -> usize {
        self.success_count + self.error_count
    }
}
