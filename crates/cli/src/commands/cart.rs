//! Cart commands.
//!
//! Every command runs inside the provider scope set up by `main` and reaches
//! the cart through `use_cart()`.

use marketplace_cart::use_cart;
use marketplace_cart_core::{Cart, NewLineItem};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Print every line in the cart.
pub fn list() {
    emit(&render_lines(&use_cart().products()));
}

/// Print item count and subtotal.
pub fn total() {
    let cart = use_cart().products();
    if cart.subtotal().is_none() {
        warn!("Cart subtotal exceeds the decimal range");
    }
    emit(&render_total(&cart));
}

/// Add one unit of a product.
pub fn add(id: &str, title: &str, image_url: &str, price: Decimal) {
    let cart = use_cart();
    if !cart.add_to_cart(NewLineItem::new(id, title, image_url, price)) {
        warn!(product_id = id, %price, "Product was not added");
        return;
    }

    let quantity = cart.products().get(id).map_or(0, |line| line.quantity);
    info!(product_id = id, quantity, "Added to cart");
}

/// Add one unit of a product already in the cart.
pub fn increment(id: &str) {
    if use_cart().increment(id) {
        info!(product_id = id, "Incremented");
    } else {
        warn!(product_id = id, "Product is not in the cart");
    }
}

/// Remove one unit of a product.
pub fn decrement(id: &str) {
    let cart = use_cart();
    if !cart.decrement(id) {
        warn!(product_id = id, "Product is not in the cart");
    } else if cart.products().contains(id) {
        info!(product_id = id, "Decremented");
    } else {
        info!(product_id = id, "Removed from cart");
    }
}

fn render_lines(cart: &Cart) -> String {
    if cart.is_empty() {
        return "cart is empty\n".to_string();
    }
    cart.iter()
        .map(|line| {
            format!(
                "{}  {} × {}  {}\n",
                line.id,
                line.quantity,
                line.price.normalize(),
                line.title
            )
        })
        .collect()
}

fn render_total(cart: &Cart) -> String {
    let subtotal = cart.subtotal().map_or_else(
        || "overflow".to_string(),
        |subtotal| subtotal.normalize().to_string(),
    );
    format!("items: {}\nsubtotal: {subtotal}\n", cart.total_quantity())
}

#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    print!("{text}");
}
