//! Storefront Cart
//!
//! The cart state machine behind the storefront page:
//! - Items deduplicated by product name, kept in first-add order
//! - Write-through persistence to a key-value backend under the `"cart"` key
//! - Deterministic projection of the cart into renderable rows
//!
//! # Architecture
//!
//! ```text
//! add/remove/clear → CartEngine → CartStore (KeyValueStore) → durable copy
//!                        ↓
//!                 RenderProjector → CartView (rows + remove bindings)
//! ```
//!
//! # Example
//!
//! ```rust
//! use storefront_cart::{CartEngine, CartStore, MemoryStorage};
//!
//! # fn example() -> Result<(), storefront_cart::CartError> {
//! let mut engine = CartEngine::load(CartStore::new(MemoryStorage::new()));
//!
//! engine.add_item("Hammer", "250", "/media/hammer.png")?;
//! engine.add_item("Hammer", "250", "/media/hammer.png")?;
//!
//! assert_eq!(engine.cart().len(), 1);
//! assert_eq!(engine.total_quantity(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod engine;
pub mod error;
pub mod render;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use engine::{AddOutcome, CartEngine};
pub use error::{CartError, StoreError};
pub use render::{CartRow, CartView, RemoveBinding, RenderEpoch, RenderProjector, RenderedCart};
pub use store::{CartStore, FileStorage, KeyValueStore, MemoryStorage, CART_KEY};
pub use types::{Cart, CartItem};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the cart
    pub use crate::engine::{AddOutcome, CartEngine};
    pub use crate::error::{CartError, StoreError};
    pub use crate::render::{CartView, RemoveBinding, RenderProjector};
    pub use crate::store::{CartStore, KeyValueStore, MemoryStorage};
    pub use crate::types::{Cart, CartItem};
}
