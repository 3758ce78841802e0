//! Storefront UI
//!
//! The page-facing layer of the storefront:
//! - **Panels**: search/cart/menu overlays, at most one open, all closed on
//!   scroll
//! - **Page bindings**: which elements exist, looked up once at the boundary
//! - **Session**: routes page events to the cart engine, the render
//!   projector and the order submitter, and reports outcomes through a
//!   [`Notifier`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_cart::{CartEngine, CartStore, MemoryStorage};
//! use storefront_ui::{LogNotifier, PageBindings, Panel, PanelState, Storefront};
//!
//! let engine = CartEngine::load(CartStore::new(MemoryStorage::new()));
//! let mut storefront = Storefront::new(engine, PageBindings::full(), Arc::new(LogNotifier), "Rs.");
//!
//! storefront.toggle(Panel::Search);
//! assert_eq!(storefront.toggle(Panel::Cart), PanelState::CartOpen);
//! assert_eq!(storefront.scroll(), PanelState::AllClosed);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod error;
pub mod notify;
pub mod page;
pub mod panel;
pub mod storefront;

// Re-exports for convenience
pub use config::StorefrontConfig;
pub use error::{ConfigError, UiError};
pub use notify::{LogNotifier, Notice, Notifier};
pub use page::{PageBindings, Role};
pub use panel::{Panel, PanelController, PanelFlags, PanelState};
pub use storefront::{Storefront, UiEvent};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a storefront page
    pub use crate::config::StorefrontConfig;
    pub use crate::error::UiError;
    pub use crate::notify::{LogNotifier, Notice, Notifier};
    pub use crate::page::{PageBindings, Role};
    pub use crate::panel::{Panel, PanelState};
    pub use crate::storefront::{Storefront, UiEvent};
}
