//! Core types for Marketplace Cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;

pub use cart::{Cart, DuplicateProduct};
pub use id::ProductId;
pub use line_item::{LineItem, NewLineItem};
pub use price::is_storable_price;
