//! Key-value storage contract and adapters.
//!
//! The cart treats durable storage as an opaque async key-value store holding
//! text values. Adapters:
//!
//! - [`MemoryStore`] - process memory, for tests and embedding
//! - [`FileStore`] - one file per key in a directory

mod file;
mod memory;

use std::{future::Future, pin::Pin};

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Object-safe boxed future used by [`KeyValueStore`] async methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors raised by key-value store adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be used by this adapter.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Reading or writing the underlying medium failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Async key-value store holding text values.
pub trait KeyValueStore: Send + Sync {
    /// Loads the value stored under `key`, if any.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<String>, StorageError>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: &'a str)
    -> StoreFuture<'a, Result<(), StorageError>>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<(), StorageError>>;
}
