//! JSON encoding of cart snapshots.
//!
//! A snapshot is the whole cart written as a JSON array of line items. There
//! is no envelope and no schema version: the stored text is exactly the array.

use thiserror::Error;

use crate::types::Cart;

/// Errors raised while encoding or decoding a cart snapshot.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The cart could not be serialized.
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// The stored text is not a valid cart snapshot.
    #[error("malformed cart snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize a cart to its stored JSON form.
///
/// # Errors
///
/// Returns `CodecError::Encode` if serialization fails.
pub fn encode_cart(cart: &Cart) -> Result<String, CodecError> {
    serde_json::to_string(cart).map_err(CodecError::Encode)
}

/// Parse a stored JSON snapshot back into a cart.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the text is not a JSON array of line
/// items, or if it lists the same product twice.
pub fn decode_cart(raw: &str) -> Result<Cart, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::Decode)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::NewLineItem;

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("b", "Mug", "https://img/m.png", Decimal::new(1999, 2)));
        cart.add(NewLineItem::new("a", "Shirt", "https://img/s.png", Decimal::from(10)));
        cart.increment("a");

        let decoded = decode_cart(&encode_cart(&cart).unwrap()).unwrap();

        assert_eq!(decoded, cart);
        let ids: Vec<_> = decoded.iter().map(|line| line.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(decoded.get("b").unwrap().price, Decimal::new(1999, 2));
    }

    #[test]
    fn test_round_trip_keeps_price_value() {
        let mut cart = Cart::new();
        for (id, raw) in [("a", "4.50"), ("b", "0.1"), ("c", "123456789012.345")] {
            let price = Decimal::from_str_exact(raw).unwrap();
            cart.add(NewLineItem::new(id, id, "u", price));
        }

        let decoded = decode_cart(&encode_cart(&cart).unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_encode_fails_for_price_a_double_cannot_hold() {
        for raw in ["1.0000000000000000001", "79228162514264337593543950335"] {
            let price = Decimal::from_str_exact(raw).unwrap();
            let line = NewLineItem::new("a", "Shirt", "u", price).with_quantity(1);
            let cart = Cart::try_from(vec![line]).unwrap();

            assert!(
                matches!(encode_cart(&cart), Err(CodecError::Encode(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_decoded_cart_encodes_again() {
        let raw = r#"[{"id":"a","title":"t","imageUrl":"u","price":1e20,"quantity":3}]"#;
        let cart = decode_cart(raw).unwrap();

        let again = decode_cart(&encode_cart(&cart).unwrap()).unwrap();
        assert_eq!(again, cart);
        let expected = Decimal::from_str_exact("300000000000000000000").unwrap();
        assert_eq!(cart.subtotal(), Some(expected));
    }

    #[test]
    fn test_empty_cart_is_empty_array() {
        assert_eq!(encode_cart(&Cart::new()).unwrap(), "[]");
        assert!(decode_cart("[]").unwrap().is_empty());
    }

    #[test]
    fn test_encoded_shape() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("a", "Shirt", "u", Decimal::from(10)));

        let value: serde_json::Value = serde_json::from_str(&encode_cart(&cart).unwrap()).unwrap();
        let line = &value[0];
        assert_eq!(line["id"], "a");
        assert_eq!(line["title"], "Shirt");
        assert_eq!(line["imageUrl"], "u");
        assert_eq!(line["price"].as_f64(), Some(10.0));
        assert_eq!(line["quantity"], 1);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_cart("not json"), Err(CodecError::Decode(_))));
        assert!(matches!(decode_cart("{}"), Err(CodecError::Decode(_))));
        assert!(matches!(
            decode_cart(r#"[{"id":"a","title":"t"}]"#),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":"a","title":"t","imageUrl":"u","price":1,"quantity":1},
            {"id":"a","title":"t","imageUrl":"u","price":1,"quantity":2}
        ]"#;
        let err = decode_cart(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
    }
}
