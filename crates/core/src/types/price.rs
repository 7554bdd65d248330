//! Unit prices stored as JSON numbers.
//!
//! Snapshots carry `price` as a plain JSON number, which every reader parses
//! as a double. A [`Decimal`] is only storable when it comes back unchanged
//! from that trip, so carts never hold a price they could not restore.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer, de, ser};

/// Whether `price` survives being written as a JSON number and read back.
///
/// ```
/// use marketplace_cart_core::is_storable_price;
/// use rust_decimal::Decimal;
///
/// assert!(is_storable_price(Decimal::new(1999, 2)));
/// assert!(!is_storable_price(Decimal::MAX));
/// ```
#[must_use]
pub fn is_storable_price(price: Decimal) -> bool {
    to_number(price).is_some()
}

fn to_number(price: Decimal) -> Option<f64> {
    let number: f64 = price.to_string().parse().ok()?;
    (from_number(number)? == price).then_some(number)
}

// `f64` display is the shortest text that parses back to the same double.
fn from_number(number: f64) -> Option<Decimal> {
    if !number.is_finite() {
        return None;
    }
    number.to_string().parse().ok()
}

pub(crate) fn serialize<S>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let number = to_number(*price).ok_or_else(|| {
        <S::Error as ser::Error>::custom(format!(
            "price {price} cannot be stored as a JSON number"
        ))
    })?;
    serializer.serialize_f64(number)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = f64::deserialize(deserializer)?;
    from_number(number).ok_or_else(|| {
        <D::Error as de::Error>::custom(format!("price {number} is out of range"))
    })
}
