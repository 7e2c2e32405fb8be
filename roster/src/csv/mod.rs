//! CSV parsing for bulk user import.
//!
//! Rows carry four logical fields, `Name,Email,Password,Roles`, where the
//! roles field is itself a comma-joined list, optionally double-quoted:
//!
//! ```text
//! John Doe,john@example.com,john123,"admin,user"
//! ```
//!
//! Two entry points exist. [`parse_raw`] takes header-less text (files picked
//! from disk); [`parse_with_header`] takes pasted text whose first line must be
//! exactly `Name,Email,Password,Roles`.

pub mod tokenizer;

use tracing::{debug, warn};

use crate::error::{RosterError, Result};
use crate::types::ImportRecord;
use crate::utils::now_iso8601;

use self::tokenizer::{match_fields, split_fields};

/// Required header row for pasted CSV.
pub const HEADER: [&str; 4] = ["Name", "Email", "Password", "Roles"];

/// Number of logical fields per row.
pub const FIELD_COUNT: usize = 4;

/// Records parsed out of one CSV text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    pub records: Vec<ImportRecord>,
    /// Non-empty rows dropped for having fewer than four fields.
    pub skipped_rows: usize,
}

impl ParsedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Trim the whole text and split it into lines. Lines are trimmed but empty
/// ones are kept so callers can count them.
fn lines(text: &str) -> Vec<&str> {
    text.trim().split('\n').map(str::trim).collect()
}

fn strip_quotes(field: &str) -> String {
    field.replace('"', "")
}

/// Split a roles field into role ids: quotes stripped, split on commas,
/// trimmed, empties dropped. Order and duplicates are kept.
pub fn parse_roles(field: &str) -> Vec<String> {
    strip_quotes(field)
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn record_from_fields<S: AsRef<str>>(fields: &[S], created_at: &str) -> Option<ImportRecord> {
    if fields.len() < FIELD_COUNT {
        return None;
    }
    Some(ImportRecord {
        name: strip_quotes(fields[0].as_ref()),
        email: strip_quotes(fields[1].as_ref()),
        password: strip_quotes(fields[2].as_ref()),
        roles: parse_roles(fields[3].as_ref()),
        created_at: created_at.to_string(),
    })
}

/// Parse header-less CSV text, one user per non-empty line.
///
/// Lines with fewer than four fields are counted in `skipped_rows`. Fields
/// beyond the fourth are ignored.
pub fn parse_raw(text: &str) -> ParsedBatch {
    parse_raw_at(text, &now_iso8601())
}

/// [`parse_raw`] with a fixed `createdAt` stamp.
pub fn parse_raw_at(text: &str, created_at: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for (idx, line) in lines(text).into_iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        match record_from_fields(&match_fields(line), created_at) {
            Some(record) => batch.records.push(record),
            None => {
                warn!(line = idx + 1, "skipping CSV row with fewer than 4 fields");
                batch.skipped_rows += 1;
            }
        }
    }
    debug!(records = batch.len(), skipped = batch.skipped_rows, "parsed raw CSV");
    batch
}

/// Check the header line of pasted CSV.
pub fn validate_header(line: &str) -> Result<()> {
    let header = split_fields(line);
    if header.len() == HEADER.len() && header.iter().zip(HEADER).all(|(h, want)| h == want) {
        Ok(())
    } else {
        Err(RosterError::Format(format!(
            "CSV must have columns: {}",
            HEADER.join(", ")
        )))
    }
}

/// Parse pasted CSV text whose first line is the header row.
///
/// Fails before looking at any data row if the text is blank, has no data
/// row, or the header is not exactly `Name,Email,Password,Roles`.
pub fn parse_with_header(text: &str) -> Result<ParsedBatch> {
    parse_with_header_at(text, &now_iso8601())
}

/// [`parse_with_header`] with a fixed `createdAt` stamp.
pub fn parse_with_header_at(text: &str, created_at: &str) -> Result<ParsedBatch> {
    let (header, rows) = split_header(text)?;
    validate_header(header)?;
    Ok(parse_rows_at(rows, created_at))
}

/// Separate the header line from the data lines, enforcing the minimum shape.
pub(crate) fn split_header(text: &str) -> Result<(&str, Vec<&str>)> {
    if text.trim().is_empty() {
        return Err(RosterError::validation("Please paste CSV data"));
    }
    let mut all = lines(text);
    if all.len() < 2 {
        return Err(RosterError::validation(
            "CSV must have at least a header row and one data row",
        ));
    }
    let rows = all.split_off(1);
    Ok((all[0], rows))
}

/// Parse data rows with the quote-aware splitter.
pub(crate) fn parse_rows_at(rows: Vec<&str>, created_at: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for (idx, line) in rows.into_iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        match record_from_fields(&split_fields(line), created_at) {
            Some(record) => batch.records.push(record),
            None => {
                // +2: one for the header, one for 1-based numbering.
                warn!(line = idx + 2, "skipping CSV row with fewer than 4 fields");
                batch.skipped_rows += 1;
            }
        }
    }
    debug!(records = batch.len(), skipped = batch.skipped_rows, "parsed CSV rows");
    batch
}

fn encode_field(field: &str) -> Result<String> {
    if field.contains('"') {
        return Err(RosterError::validation(format!(
            "field contains a double quote: {field}"
        )));
    }
    if field.contains(['\n', '\r']) {
        return Err(RosterError::validation(format!(
            "field contains a line break: {field:?}"
        )));
    }
    if field.contains(',') {
        Ok(format!("\"{field}\""))
    } else {
        Ok(field.to_string())
    }
}

/// Render one record as a CSV line readable by both parsers.
///
/// An empty roles list encodes as a trailing comma. [`parse_with_header`]
/// reads that back as no roles, but [`parse_raw`] drops empty fields and so
/// skips the row: a raw-path round-trip needs at least one role.
pub fn encode_record(record: &ImportRecord) -> Result<String> {
    let roles = record.roles.join(",");
    let fields = [
        encode_field(&record.name)?,
        encode_field(&record.email)?,
        encode_field(&record.password)?,
        encode_field(&roles)?,
    ];
    Ok(fields.join(","))
}

/// Render records as pasted-format CSV, header row first.
pub fn encode_with_header(records: &[ImportRecord]) -> Result<String> {
    let mut out = HEADER.join(",");
    for record in records {
        out.push('\n');
        out.push_str(&encode_record(record)?);
    }
    Ok(out)
}
