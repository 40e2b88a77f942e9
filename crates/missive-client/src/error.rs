use thiserror::Error;

use missive_store::StoreError;

/// Errors surfaced by the client layer's collaborators.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A message provider could not serve a ledger.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
