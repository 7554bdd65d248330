//! Marketplace Cart - persistent cart state with a scoped provider.
//!
//! The cart lives in memory as an immutable [`Cart`] snapshot. Mutations
//! replace the snapshot and return immediately; a background worker mirrors
//! the newest snapshot to a [`KeyValueStore`] under [`STORAGE_KEY`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use marketplace_cart::{CartProvider, MemoryStore, use_cart};
//! use marketplace_cart_core::NewLineItem;
//! use rust_decimal::Decimal;
//!
//! # async fn demo() -> Result<(), marketplace_cart::CartError> {
//! let provider = CartProvider::start(MemoryStore::new());
//!
//! provider
//!     .scope(async {
//!         let cart = use_cart();
//!         cart.add_to_cart(NewLineItem::new("a", "Shirt", "u", Decimal::from(10)));
//!         cart.increment("a");
//!     })
//!     .await;
//!
//! provider.shutdown().await
//! # }
//! ```
//!
//! # Modules
//!
//! - [`storage`] - Key-value store contract and adapters
//! - [`store`] - In-memory cart state and the consumer handle
//! - [`provider`] - Provider scope, `use_cart`, worker lifecycle
//! - [`config`] - Environment configuration
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;
mod worker;

pub use config::{CartConfig, ConfigError, LogFormat};
pub use error::{CartError, Result};
pub use provider::{CartProvider, try_use_cart, use_cart};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartHandle, CartWatcher};

pub use marketplace_cart_core::{Cart, LineItem, NewLineItem, ProductId};

/// Key under which the cart snapshot is stored.
pub const STORAGE_KEY: &str = "products";
