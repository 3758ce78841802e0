//! Cart view projection
//!
//! [`CartView::project`] is a pure function of the cart: same cart, same
//! rows. [`RenderProjector`] adds render epochs on top of it. Each render
//! discards the previous rows, so remove bindings handed out by an older
//! render no longer resolve. Bindings also stop resolving once the cart
//! revision moves past the one that was rendered, even if no new render
//! happened.

use crate::types::Cart;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// Monotonic render counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderEpoch(pub u64);

impl std::fmt::Display for RenderEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remove affordance bound to a row during one render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoveBinding {
    /// Render that produced the row
    pub epoch: RenderEpoch,
    /// Row position at bind time
    pub position: usize,
}

/// One rendered cart row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    /// Row position, also the remove affordance's tag
    pub position: usize,
    /// Product name
    pub name: String,
    /// Unit price as stored
    pub price: String,
    /// Product image URL
    pub image: String,
    /// Units in cart
    pub quantity: u32,
}

/// Rows derived from a cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    rows: Vec<CartRow>,
}

impl CartView {
    /// Derive one row per cart item, in cart order
    #[must_use]
    pub fn project(cart: &Cart) -> Self {
        let rows = cart
            .iter()
            .enumerate()
            .map(|(position, item)| CartRow {
                position,
                name: item.name.clone(),
                price: item.price.clone(),
                image: item.image.clone(),
                quantity: item.quantity(),
            })
            .collect();
        Self { rows }
    }

    /// Rendered rows
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[CartRow] {
        &self.rows
    }

    /// Check if there is nothing to show
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render rows as cart-box markup; every interpolated value is escaped
    #[must_use]
    pub fn to_html(&self, currency_label: &str) -> String {
        let mut html = String::new();
        for row in &self.rows {
            // Writing into a String cannot fail.
            let _ = write!(
                html,
                concat!(
                    "<div class=\"box\">\n",
                    "    <i class=\"fas fa-trash remove-btn\" data-index=\"{position}\"></i>\n",
                    "    <img src=\"{image}\" alt=\"{alt}\">\n",
                    "    <div class=\"content\">\n",
                    "        <h3>{name}</h3>\n",
                    "        <span class=\"price\">{price} {currency}</span>\n",
                    "        <span class=\"quantity\">Qty: {quantity}</span>\n",
                    "    </div>\n",
                    "</div>\n",
                ),
                position = row.position,
                image = encode_double_quoted_attribute(&row.image),
                alt = encode_double_quoted_attribute(&row.name),
                name = encode_text(&row.name),
                price = encode_text(&row.price),
                currency = encode_text(currency_label),
                quantity = row.quantity,
            );
        }
        html
    }
}

/// Output of one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCart {
    /// Epoch of this render
    pub epoch: RenderEpoch,
    /// Cart revision the rows were derived from
    pub revision: u64,
    /// Projected rows
    pub view: CartView,
}

impl RenderedCart {
    /// Remove bindings for every row, tagged with this render's epoch
    #[must_use]
    pub fn bindings(&self) -> Vec<RemoveBinding> {
        self.view
            .rows()
            .iter()
            .map(|row| RemoveBinding {
                epoch: self.epoch,
                position: row.position,
            })
            .collect()
    }

    /// Remove binding for one row
    #[must_use]
    pub fn binding(&self, position: usize) -> Option<RemoveBinding> {
        (position < self.view.rows().len()).then_some(RemoveBinding {
            epoch: self.epoch,
            position,
        })
    }
}

/// Stateful renderer that tracks the current epoch
#[derive(Debug, Clone, Default)]
pub struct RenderProjector {
    epoch: RenderEpoch,
    revision: u64,
    row_count: usize,
}

impl RenderProjector {
    /// Create projector; nothing is rendered until [`Self::render`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Epoch of the latest render
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> RenderEpoch {
        self.epoch
    }

    /// Re-derive the view of `cart` at `revision`, invalidating all
    /// earlier bindings
    pub fn render(&mut self, cart: &Cart, revision: u64) -> RenderedCart {
        self.epoch = RenderEpoch(self.epoch.0 + 1);
        self.revision = revision;
        let view = CartView::project(cart);
        self.row_count = view.rows().len();
        tracing::debug!("Rendered {} cart rows (epoch {})", self.row_count, self.epoch);
        RenderedCart {
            epoch: self.epoch,
            revision,
            view,
        }
    }

    /// Position a binding refers to, if it belongs to the latest render and
    /// the cart is still at the rendered revision
    #[must_use]
    pub fn resolve(&self, binding: RemoveBinding, revision: u64) -> Option<usize> {
        if revision != self.revision {
            tracing::debug!(
                "Cart changed since render (revision {}, rendered {})",
                revision,
                self.revision
            );
            return None;
        }
        if binding.epoch != self.epoch || binding.position >= self.row_count {
            tracing::debug!(
                "Stale remove binding (epoch {}, current {})",
                binding.epoch,
                self.epoch
            );
            return None;
        }
        Some(binding.position)
    }
}
