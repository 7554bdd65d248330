//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product line in the cart.
///
/// ## Wire format
///
/// Persisted as a JSON object with camel-cased keys:
///
/// ```json
/// { "id": "a", "title": "Shirt", "imageUrl": "https://...", "price": 10.5, "quantity": 2 }
/// ```
///
/// `price` is written as a JSON number, so only prices a double holds
/// exactly can be stored (see [`is_storable_price`](super::price::is_storable_price)).
/// Snapshots written by older clients that used `image_url` are still
/// accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Product title as shown in the cart.
    pub title: String,
    /// URL of the product image.
    #[serde(alias = "image_url")]
    pub image_url: String,
    /// Unit price.
    #[serde(with = "super::price")]
    pub price: Decimal,
    /// Number of units in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// Total price of this line (`price × quantity`), or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A product about to be added to the cart.
///
/// This is a [`LineItem`] without a quantity: adding a product always
/// contributes exactly one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL of the product image.
    #[serde(alias = "image_url")]
    pub image_url: String,
    /// Unit price.
    #[serde(with = "super::price")]
    pub price: Decimal,
}

impl NewLineItem {
    /// Create a new candidate line item.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the candidate into a cart line with the given quantity.
    #[must_use]
    pub fn with_quantity(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}
