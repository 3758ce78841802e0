//! Cart engine
//!
//! Owns the in-memory cart and applies every mutation write-through:
//! the cart is saved to the [`CartStore`] before the operation returns.
//! Each mutation also bumps [`CartEngine::revision`] so views can tell
//! they are out of date.

use crate::error::CartError;
use crate::store::CartStore;
use crate::types::{Cart, CartItem};

/// Result of adding a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New item appended at `position`
    Inserted {
        /// Position of the new item
        position: usize,
    },
    /// Existing item at `position` bumped to `quantity`
    Incremented {
        /// Position of the existing item
        position: usize,
        /// Quantity after the bump
        quantity: u32,
    },
}

impl AddOutcome {
    /// Position of the affected item
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Inserted { position } | Self::Incremented { position, .. } => *position,
        }
    }
}

/// Sole owner of the cart
#[derive(Debug)]
pub struct CartEngine {
    cart: Cart,
    store: CartStore,
    revision: u64,
}

impl CartEngine {
    /// Create engine seeded from the store's persisted cart
    #[must_use]
    pub fn load(store: CartStore) -> Self {
        let cart = store.load();
        tracing::debug!("Loaded cart with {} items", cart.len());
        Self {
            cart,
            store,
            revision: 0,
        }
    }

    /// Current cart
    #[inline]
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Mutation counter, starts at zero
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add one unit of a product
    ///
    /// A product already in the cart gets its quantity bumped; its stored
    /// price and image are left as they were at first add.
    ///
    /// # Errors
    /// - `CartError::Persist` if the write-through fails (the in-memory
    ///   cart keeps the change)
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<AddOutcome, CartError> {
        let name = name.into();
        let items = self.cart.items_mut();

        let outcome = if let Some(position) = items.iter().position(|item| item.name == name) {
            let item = &mut items[position];
            item.bump();
            AddOutcome::Incremented {
                position,
                quantity: item.quantity(),
            }
        } else {
            items.push(CartItem::new(name, price, image));
            AddOutcome::Inserted {
                position: items.len() - 1,
            }
        };

        self.commit()?;
        Ok(outcome)
    }

    /// Remove the item at a position
    ///
    /// Positions are only meaningful against the cart they were read from;
    /// callers holding rendered positions should resolve them through
    /// [`crate::RenderProjector::resolve`] first.
    ///
    /// # Errors
    /// - `CartError::IndexOutOfRange` with no state change and no write
    /// - `CartError::Persist` if the write-through fails
    pub fn remove_item(&mut self, index: usize) -> Result<CartItem, CartError> {
        let len = self.cart.len();
        if index >= len {
            tracing::warn!("Ignoring removal at position {} (cart has {} items)", index, len);
            return Err(CartError::IndexOutOfRange { index, len });
        }

        let removed = self.cart.items_mut().remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Remove the item with this name
    ///
    /// # Errors
    /// - `CartError::NotFound` with no state change and no write
    /// - `CartError::Persist` if the write-through fails
    pub fn remove_by_name(&mut self, name: &str) -> Result<CartItem, CartError> {
        let index = self
            .cart
            .position(name)
            .ok_or_else(|| CartError::NotFound(name.to_string()))?;
        self.remove_item(index)
    }

    /// Empty the cart
    ///
    /// # Errors
    /// - `CartError::Persist` if the write-through fails
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.items_mut().clear();
        self.commit()
    }

    /// Sum of all quantities
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.cart.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of `price × quantity`; items with unparsable prices count as zero
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.cart
            .iter()
            .filter_map(|item| {
                let total = item.line_total();
                if total.is_none() {
                    tracing::debug!("Unparsable price {:?} for {}", item.price, item.name);
                }
                total
            })
            .sum()
    }

    fn commit(&mut self) -> Result<(), CartError> {
        self.revision += 1;
        self.store.save(&self.cart).map_err(|e| {
            tracing::warn!("Cart write-through failed: {}", e);
            CartError::Persist(e)
        })
    }
}
