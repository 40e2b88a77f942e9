use thiserror::Error;

/// A provider row could not be turned into a [`RawMessage`](crate::types::RawMessage).
///
/// The row is skipped and the merge continues with the rest of the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in column {column}: {reason}")]
    InvalidValue { column: String, reason: String },
}

impl MalformedRecordError {
    pub fn invalid(column: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

/// The dedup-key lookup could not be resolved by the storage layer.
///
/// Aborts the current upsert only; nothing is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageLookupError {
    #[error("Lookup result is missing column: {0}")]
    MissingColumn(String),

    #[error("Lookup failed: {0}")]
    Backend(String),
}
