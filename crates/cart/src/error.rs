//! Unified error handling for the cart runtime.

use marketplace_cart_core::CodecError;
use thiserror::Error;

use crate::storage::StorageError;

/// Cart runtime error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A snapshot could not be encoded or the stored one could not be decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] CodecError),

    /// The cart was accessed outside of a provider scope.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    /// The background worker panicked or was cancelled.
    #[error("cart worker stopped abnormally: {0}")]
    WorkerFailed(#[source] tokio::task::JoinError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
