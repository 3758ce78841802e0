//! Cart data model
//!
//! - `CartItem`: one selected product, identified by its name
//! - `Cart`: ordered sequence of items, at most one per name
//!
//! Both serialize to the JSON shape kept in durable storage:
//! `[{"name": .., "price": .., "image": .., "quantity": ..}]`.

use crate::error::CartError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::num::NonZeroU32;

/// A product selected into the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name (identity key)
    pub name: String,
    /// Unit price exactly as shown on the product card
    pub price: String,
    /// Product image URL
    pub image: String,
    /// Number of units, never zero
    pub quantity: NonZeroU32,
}

impl CartItem {
    /// Create an item with a quantity of one
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, price: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image: image.into(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// With explicit quantity
    ///
    /// # Errors
    /// - `CartError::ZeroQuantity` if `quantity` is zero
    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, CartError> {
        self.quantity =
            NonZeroU32::new(quantity).ok_or_else(|| CartError::ZeroQuantity(self.name.clone()))?;
        Ok(self)
    }

    /// Quantity as a plain integer
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price as a number, if the price string parses
    #[must_use]
    pub fn unit_price(&self) -> Option<f64> {
        self.price.trim().parse::<f64>().ok().filter(|p| p.is_finite())
    }

    /// Unit price times quantity, if the price string parses
    #[must_use]
    pub fn line_total(&self) -> Option<f64> {
        self.unit_price().map(|p| p * f64::from(self.quantity()))
    }

    pub(crate) fn bump(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}

/// Ordered, name-deduplicated collection of cart items
///
/// Order is first-add order; bumping a quantity never moves an item.
/// Mutation is reserved to [`crate::CartEngine`], which persists every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, rejecting duplicate names
    ///
    /// # Errors
    /// - `CartError::DuplicateItem` if two items share a name
    pub fn try_from_items(items: Vec<CartItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.name.as_str()) {
                return Err(CartError::DuplicateItem(item.name.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Items in cart order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in cart order
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Item at a position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CartItem> {
        self.items.get(index)
    }

    /// Position of the item with this name
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// Check if an item with this name is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of distinct items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart has no items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<CartItem> {
        &mut self.items
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::try_from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_has_quantity_one() {
        let item = CartItem::new("Drill", "1200", "/media/drill.png");
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn with_quantity_rejects_zero() {
        let result = CartItem::new("Drill", "1200", "").with_quantity(0);
        assert!(matches!(result, Err(CartError::ZeroQuantity(name)) if name == "Drill"));
    }

    #[test]
    fn unit_price_parses_trimmed_numbers() {
        assert_eq!(CartItem::new("a", " 99.5 ", "").unit_price(), Some(99.5));
        assert_eq!(CartItem::new("a", "ninety", "").unit_price(), None);
        assert_eq!(CartItem::new("a", "NaN", "").unit_price(), None);
    }

    #[test]
    fn line_total_multiplies_quantity() {
        let item = CartItem::new("a", "20", "").with_quantity(3).unwrap();
        assert_eq!(item.line_total(), Some(60.0));
    }

    #[test]
    fn try_from_items_rejects_duplicates() {
        let items = vec![CartItem::new("Saw", "1", ""), CartItem::new("Saw", "2", "")];
        assert!(matches!(
            Cart::try_from_items(items),
            Err(CartError::DuplicateItem(name)) if name == "Saw"
        ));
    }

    #[test]
    fn serializes_as_plain_array() {
        let cart = Cart::try_from_items(vec![CartItem::new("Saw", "150", "/saw.png")]).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"Saw","price":"150","image":"/saw.png","quantity":1}]"#
        );
    }

    #[test]
    fn deserialize_rejects_zero_quantity() {
        let json = r#"[{"name":"Saw","price":"150","image":"","quantity":0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_duplicate_names() {
        let json = r#"[
            {"name":"Saw","price":"150","image":"","quantity":1},
            {"name":"Saw","price":"150","image":"","quantity":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn position_finds_by_name() {
        let cart = Cart::try_from_items(vec![
            CartItem::new("Saw", "1", ""),
            CartItem::new("Nails", "2", ""),
        ])
        .unwrap();
        assert_eq!(cart.position("Nails"), Some(1));
        assert!(!cart.contains("Glue"));
    }
}
