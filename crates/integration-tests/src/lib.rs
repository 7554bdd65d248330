//! Integration tests for Marketplace Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Operation sequences through the provider scope
//! - `cart_persistence` - Restoring and persisting snapshots across providers
//!
//! Shared fixtures live here.

#![cfg_attr(not(test), forbid(unsafe_code))]

use marketplace_cart_core::NewLineItem;
use rust_decimal::Decimal;

/// The shirt product used throughout the scenarios.
#[must_use]
pub fn shirt() -> NewLineItem {
    NewLineItem::new("a", "Shirt", "u", Decimal::from(10))
}

/// A second product.
#[must_use]
pub fn mug() -> NewLineItem {
    NewLineItem::new("b", "Mug", "https://img.example/mug.png", Decimal::new(1999, 2))
}

/// `(id, quantity)` pairs of a cart, in display order.
#[must_use]
pub fn quantities(cart: &marketplace_cart_core::Cart) -> Vec<(String, u32)> {
    cart.iter()
        .map(|line| (line.id.to_string(), line.quantity))
        .collect()
}
