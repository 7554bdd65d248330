//! The cart: an ordered list of line items keyed by product ID.
//!
//! All mutation rules live here so they can be tested without a runtime.
//! Each mutation reports whether it changed the cart, which lets callers
//! skip publishing and persisting no-ops.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::line_item::{LineItem, NewLineItem};
use super::price::is_storable_price;

/// An ordered collection of line items with at most one line per product.
///
/// Order is insertion order and only matters for display.
///
/// ## Examples
///
/// ```
/// use marketplace_cart_core::{Cart, NewLineItem};
/// use rust_decimal::Decimal;
///
/// let mut cart = Cart::new();
/// cart.add(NewLineItem::new("a", "Shirt", "u", Decimal::from(10)));
/// cart.increment("a");
/// assert_eq!(cart.get("a").map(|line| line.quantity), Some(2));
///
/// cart.decrement("a");
/// cart.decrement("a");
/// assert!(cart.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

/// A list of line items contained the same product twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate product id in cart: {0}")]
pub struct DuplicateProduct(pub String);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Whether the cart holds a line for a product.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Sum of all quantities (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line totals, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.line_total()?))
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity grows by one and
    /// the existing title, image and price are kept; the candidate's fields
    /// are ignored. Otherwise the product is appended with quantity 1,
    /// unless its price cannot be stored (see [`is_storable_price`]).
    ///
    /// Returns `true` if the cart changed.
    pub fn add(&mut self, item: NewLineItem) -> bool {
        if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
            return bump(line);
        }
        if !is_storable_price(item.price) {
            return false;
        }
        self.items.push(item.with_quantity(1));
        true
    }

    /// Add one unit of a product already in the cart.
    ///
    /// Returns `false` (and leaves the cart untouched) if the product is not
    /// in the cart.
    pub fn increment(&mut self, id: &str) -> bool {
        self.items
            .iter_mut()
            .find(|line| line.id == id)
            .is_some_and(bump)
    }

    /// Remove one unit of a product.
    ///
    /// A line whose quantity would drop to zero is removed from the cart.
    /// Returns `false` if the product is not in the cart.
    pub fn decrement(&mut self, id: &str) -> bool {
        let Some(pos) = self.items.iter().position(|line| line.id == id) else {
            return false;
        };

        let remaining = self
            .items
            .get(pos)
            .map_or(0, |line| line.quantity.saturating_sub(1));

        if remaining == 0 {
            self.items.remove(pos);
        } else if let Some(line) = self.items.get_mut(pos) {
            line.quantity = remaining;
        }
        true
    }
}

fn bump(line: &mut LineItem) -> bool {
    match line.quantity.checked_add(1) {
        Some(quantity) => {
            line.quantity = quantity;
            true
        }
        None => false,
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = DuplicateProduct;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for line in &items {
            if !seen.insert(line.id.as_str()) {
                return Err(DuplicateProduct(line.id.to_string()));
            }
        }
        Ok(Self { items })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
