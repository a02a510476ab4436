//! Store error types.

use thiserror::Error;

/// Errors that can occur against the key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend refused or failed the operation (quota, disabled storage).
    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    /// Storage is unavailable altogether.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Failed to (de)serialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
}
