//! Bulk user import: CSV text in, one `POST /users` per record, tally out.
//!
//! Records are created one at a time, each request awaited before the next is
//! sent. A failed create is counted and the batch moves on; nothing aborts a
//! batch once it has started.

use std::path::Path;

use tracing::{info, warn};

use crate::csv::{self, ParsedBatch};
use crate::error::{RosterError, Result};
use crate::rest::RosterHttpClient;
use crate::types::ImportResult;

/// Progress of one import batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    ValidatingHeader,
    Aborted(String),
    ParsingRows,
    /// `done` of `total` records have been sent.
    Importing { done: usize, total: usize },
    Summarizing,
}

/// Import pasted CSV text (header row required).
pub async fn import_pasted(client: &RosterHttpClient, text: &str) -> Result<ImportResult> {
    import_pasted_with_progress(client, text, |_| {}).await
}

/// [`import_pasted`] reporting every phase change to `on_phase`.
pub async fn import_pasted_with_progress<F>(
    client: &RosterHttpClient,
    text: &str,
    mut on_phase: F,
) -> Result<ImportResult>
where
    F: FnMut(&ImportPhase),
{
    on_phase(&ImportPhase::ValidatingHeader);
    let checked = csv::split_header(text).and_then(|(header, rows)| {
        csv::validate_header(header)?;
        Ok(rows)
    });
    let rows = match checked {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "CSV import aborted");
            on_phase(&ImportPhase::Aborted(e.to_string()));
            on_phase(&ImportPhase::Idle);
            return Err(e);
        }
    };

    on_phase(&ImportPhase::ParsingRows);
    let batch = csv::parse_rows_at(rows, &crate::utils::now_iso8601());
    run_batch(client, batch, on_phase).await
}

/// Import a header-less CSV file from disk.
pub async fn import_file(client: &RosterHttpClient, path: impl AsRef<Path>) -> Result<ImportResult> {
    let text = read_csv_file(path).await?;
    let batch = csv::parse_raw(&text);
    run_batch(client, batch, |_| {}).await
}

/// Read a CSV file as UTF-8 text.
///
/// A leading `file://` is stripped. If the strict UTF-8 read fails, the raw
/// bytes are read again and decoded lossily before giving up. Blank content is
/// a validation error.
pub async fn read_csv_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();
    let path = match path_str.strip_prefix("file://") {
        Some(stripped) => Path::new(stripped).to_path_buf(),
        None => path.to_path_buf(),
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "UTF-8 read failed, retrying as raw bytes");
            let bytes = tokio::fs::read(&path).await?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    if text.trim().is_empty() {
        return Err(RosterError::validation("file is empty"));
    }
    Ok(text)
}

/// Create every record in `batch`, sequentially, and tally the outcomes.
///
/// Returns [`RosterError::NoRecords`] without touching the network when the
/// batch is empty.
pub async fn run_batch<F>(
    client: &RosterHttpClient,
    batch: ParsedBatch,
    mut on_phase: F,
) -> Result<ImportResult>
where
    F: FnMut(&ImportPhase),
{
    if batch.is_empty() {
        warn!(skipped = batch.skipped_rows, "no valid users in CSV");
        on_phase(&ImportPhase::Aborted(RosterError::NoRecords.to_string()));
        on_phase(&ImportPhase::Idle);
        return Err(RosterError::NoRecords);
    }

    let total = batch.len();
    let mut result = ImportResult {
        skipped_rows: batch.skipped_rows,
        ..Default::default()
    };
    info!(total, skipped = batch.skipped_rows, "importing users");

    for (done, record) in batch.records.iter().enumerate() {
        on_phase(&ImportPhase::Importing { done, total });
        match client.create_user(record).await {
            Ok(()) => result.success_count += 1,
            Err(e) => {
                warn!(email = %record.email, error = %e, "user import failed");
                result.error_count += 1;
            }
        }
    }
    on_phase(&ImportPhase::Importing { done: total, total });

    on_phase(&ImportPhase::Summarizing);
    info!(
        success = result.success_count,
        failed = result.error_count,
        skipped = result.skipped_rows,
        "import complete"
    );
    on_phase(&ImportPhase::Idle);
    Ok(result)
}
