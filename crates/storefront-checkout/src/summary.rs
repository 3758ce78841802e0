//! Human-readable order summary sent as the query message

use storefront_cart::Cart;

/// Heading of every order message
pub const ORDER_HEADING: &str = "Order Details:";

/// Build the order message: heading, then one line per item
///
/// ```text
/// Order Details:
/// Hammer (Qty: 2) - 250 Rs.
/// Nails (Qty: 1) - 40 Rs.
/// ```
#[must_use]
pub fn order_message(cart: &Cart, currency_label: &str) -> String {
    let lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "{} (Qty: {}) - {} {}",
                item.name,
                item.quantity(),
                item.price,
                currency_label
            )
        })
        .collect();
    format!("{ORDER_HEADING}\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_cart::CartItem;

    #[test]
    fn one_line_per_item() {
        let cart = Cart::try_from_items(vec![
            CartItem::new("Hammer", "250", "").with_quantity(2).unwrap(),
            CartItem::new("Nails", "40", ""),
        ])
        .unwrap();

        assert_eq!(
            order_message(&cart, "Rs."),
            "Order Details:\nHammer (Qty: 2) - 250 Rs.\nNails (Qty: 1) - 40 Rs."
        );
    }
}
