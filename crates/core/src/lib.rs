//! Marketplace Cart Core - Cart domain types.
//!
//! This crate provides the types shared by every Marketplace Cart component:
//! - `cart` - The `CartStore` runtime (persistence, provider scope)
//! - `cli` - Command-line driver for the cart over an on-disk store
//!
//! # Architecture
//!
//! The core crate contains only types and the mutation rules of a cart - no
//! I/O, no async runtime, no storage. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, line items and the cart itself
//! - [`codec`] - JSON encoding of a cart snapshot as it is persisted

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod types;

pub use codec::{CodecError, decode_cart, encode_cart};
pub use types::*;
