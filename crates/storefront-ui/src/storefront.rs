//! Storefront page session
//!
//! Single-threaded event dispatch for one page: every handler runs to
//! completion before the next event. Checkout is split in two so the
//! network wait never blocks other events:
//!
//! ```text
//! begin_checkout() → PendingOrder ──send()──→ SubmitOutcome → finish_checkout()
//!        │                                                        │
//!   validation notice                                 notice + clear + re-render
//! ```

use crate::config::StorefrontConfig;
use crate::error::UiError;
use crate::notify::{Notice, Notifier};
use crate::page::{PageBindings, Role};
use crate::panel::{Panel, PanelController, PanelState};
use std::sync::Arc;
use storefront_cart::{
    AddOutcome, Cart, CartEngine, CartItem, CartStore, FileStorage, RemoveBinding,
    RenderProjector, RenderedCart,
};
use storefront_checkout::{
    CheckoutError, ContactForm, ContactOutcome, HttpTransport, OrderSubmitter, PendingOrder,
    QueryTransport, SubmitOutcome,
};

/// Discrete page event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Overlay toggle button clicked
    Toggle(Panel),
    /// Page scrolled
    Scroll,
    /// "Add to cart" clicked on a product card
    AddToCart {
        /// Product name
        name: String,
        /// Price as shown on the card
        price: String,
        /// Card image URL
        image: String,
    },
    /// Remove icon clicked on a rendered row
    Remove(RemoveBinding),
    /// Email input edited
    EmailChanged(String),
}

/// One storefront page
pub struct Storefront {
    engine: CartEngine,
    panels: PanelController,
    projector: RenderProjector,
    rendered: Option<RenderedCart>,
    page: PageBindings,
    submitter: OrderSubmitter,
    notifier: Arc<dyn Notifier>,
    currency_label: String,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("engine", &self.engine)
            .field("panels", &self.panels)
            .field("page", &self.page)
            .field("rendered", &self.rendered)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create session and render the loaded cart
    #[must_use]
    pub fn new(
        engine: CartEngine,
        page: PageBindings,
        notifier: Arc<dyn Notifier>,
        currency_label: impl Into<String>,
    ) -> Self {
        let currency_label = currency_label.into();
        let mut storefront = Self {
            engine,
            panels: PanelController::new(),
            projector: RenderProjector::new(),
            rendered: None,
            page,
            submitter: OrderSubmitter::new(currency_label.clone()),
            notifier,
            currency_label,
        };
        storefront.rerender();
        storefront
    }

    /// Create session over file storage as configured
    #[must_use]
    pub fn from_config(
        config: &StorefrontConfig,
        page: PageBindings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = CartStore::new(FileStorage::new(&config.storage_dir));
        Self::new(
            CartEngine::load(store),
            page,
            notifier,
            config.currency_label.clone(),
        )
    }

    /// Cart engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &CartEngine {
        &self.engine
    }

    /// Current cart
    #[inline]
    #[must_use]
    pub fn cart(&self) -> &Cart {
        self.engine.cart()
    }

    /// Overlay state
    #[inline]
    #[must_use]
    pub fn panel_state(&self) -> PanelState {
        self.panels.state()
    }

    /// Page bindings
    #[inline]
    #[must_use]
    pub fn page(&self) -> &PageBindings {
        &self.page
    }

    /// Mutable page bindings
    #[inline]
    pub fn page_mut(&mut self) -> &mut PageBindings {
        &mut self.page
    }

    /// Latest render, `None` if the cart container is absent
    #[inline]
    #[must_use]
    pub fn rendered(&self) -> Option<&RenderedCart> {
        self.rendered.as_ref()
    }

    /// Latest render as markup
    #[must_use]
    pub fn rendered_html(&self) -> Option<String> {
        self.rendered
            .as_ref()
            .map(|r| r.view.to_html(&self.currency_label))
    }

    /// Order submitter
    #[inline]
    #[must_use]
    pub fn submitter(&self) -> &OrderSubmitter {
        &self.submitter
    }

    /// Handle one synchronous event
    ///
    /// # Errors
    /// - `UiError::Cart` if a cart mutation fails
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), UiError> {
        match event {
            UiEvent::Toggle(panel) => {
                self.toggle(panel);
            }
            UiEvent::Scroll => {
                self.scroll();
            }
            UiEvent::AddToCart { name, price, image } => {
                self.add_to_cart(name, price, image)?;
            }
            UiEvent::Remove(binding) => {
                self.click_remove(binding)?;
            }
            UiEvent::EmailChanged(email) => self.page.set_email(email),
        }
        Ok(())
    }

    /// Toggle an overlay; inert if its button is absent
    pub fn toggle(&mut self, panel: Panel) -> PanelState {
        let button = match panel {
            Panel::Search => Role::SearchToggle,
            Panel::Cart => Role::CartToggle,
            Panel::Menu => Role::MenuToggle,
        };
        if self.page.has(button) {
            self.panels.toggle(panel)
        } else {
            self.panels.state()
        }
    }

    /// Close every overlay
    pub fn scroll(&mut self) -> PanelState {
        self.panels.on_scroll()
    }

    /// Add one unit of a product and re-render
    ///
    /// # Errors
    /// - `UiError::Cart` if the write-through fails
    pub fn add_to_cart(
        &mut self,
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<AddOutcome, UiError> {
        let result = self.engine.add_item(name, price, image);
        self.after_mutation(result)
    }

    /// Remove the row behind a remove binding and re-render
    ///
    /// Bindings from an earlier render, or from before a cart change that
    /// was never rendered, are ignored (`Ok(None)`).
    ///
    /// # Errors
    /// - `UiError::Cart` if the write-through fails
    pub fn click_remove(&mut self, binding: RemoveBinding) -> Result<Option<CartItem>, UiError> {
        let Some(position) = self.projector.resolve(binding, self.engine.revision()) else {
            return Ok(None);
        };
        let result = self.engine.remove_item(position);
        self.after_mutation(result).map(Some)
    }

    /// Remove a product by name and re-render
    ///
    /// # Errors
    /// - `UiError::Cart` if absent or the write-through fails
    pub fn remove_product(&mut self, name: &str) -> Result<CartItem, UiError> {
        let result = self.engine.remove_by_name(name);
        self.after_mutation(result)
    }

    /// Empty the cart and re-render
    ///
    /// # Errors
    /// - `UiError::Cart` if the write-through fails
    pub fn clear_cart(&mut self) -> Result<(), UiError> {
        let result = self.engine.clear();
        self.after_mutation(result)
    }

    /// Re-derive the cart view
    ///
    /// # Errors
    /// - `UiError::MissingElement` if the cart container is absent
    pub fn render(&mut self) -> Result<&RenderedCart, UiError> {
        self.page.require(Role::CartContainer)?;
        let rendered = self
            .projector
            .render(self.engine.cart(), self.engine.revision());
        Ok(self.rendered.insert(rendered))
    }

    /// Validate checkout and take the in-flight slot
    ///
    /// Returns `Ok(None)` when the page has no checkout button. Validation
    /// failures are shown to the shopper before being returned.
    ///
    /// # Errors
    /// - `UiError::MissingElement` if the email input is absent
    /// - `UiError::Checkout` for failed preconditions
    pub fn begin_checkout(&mut self) -> Result<Option<PendingOrder>, UiError> {
        if !self.page.has(Role::Checkout) {
            return Ok(None);
        }
        self.page.require(Role::EmailInput)?;
        let email = self.page.email().unwrap_or_default();

        match self
            .submitter
            .prepare(self.engine.cart(), email, self.page.csrf_token())
        {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                if e.is_validation() {
                    tracing::debug!("Checkout blocked: {}", e);
                } else {
                    tracing::warn!("Checkout refused: {}", e);
                }
                if let Some(notice) = checkout_notice(&e) {
                    self.notifier.notify(&notice);
                }
                Err(e.into())
            }
        }
    }

    /// Apply a finished order: notify, clear on acceptance, re-render
    ///
    /// # Errors
    /// - `UiError::Cart` if clearing cannot be written through
    pub fn finish_checkout(&mut self, outcome: &SubmitOutcome) -> Result<(), UiError> {
        let notice = match outcome {
            SubmitOutcome::Accepted => Notice::OrderPlaced,
            SubmitOutcome::Rejected(reason) => Notice::OrderRejected(reason.clone()),
            SubmitOutcome::TransportFailed(_) => Notice::OrderNetworkError,
        };
        self.notifier.notify(&notice);

        if outcome.is_accepted() {
            tracing::info!("Order accepted, clearing cart");
            let result = outcome.apply(&mut self.engine);
            self.after_mutation(result)?;
        }
        Ok(())
    }

    /// Run a whole checkout against `transport`
    ///
    /// # Errors
    /// See [`Self::begin_checkout`] and [`Self::finish_checkout`]
    pub async fn checkout(
        &mut self,
        transport: &dyn QueryTransport,
    ) -> Result<Option<SubmitOutcome>, UiError> {
        let Some(pending) = self.begin_checkout()? else {
            return Ok(None);
        };
        let outcome = pending.send(transport).await;
        self.finish_checkout(&outcome)?;
        Ok(Some(outcome))
    }

    /// Submit the contact form; inert if the page has no contact form
    ///
    /// # Errors
    /// - `UiError::Checkout` if the form carries no CSRF token
    pub async fn submit_contact(
        &self,
        form: &mut ContactForm,
        transport: &dyn QueryTransport,
    ) -> Result<Option<ContactOutcome>, UiError> {
        if !self.page.has(Role::ContactForm) {
            return Ok(None);
        }
        let outcome = match form.submit(transport).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.notifier.notify(&Notice::MissingSecurityToken);
                return Err(e.into());
            }
        };
        let notice = match &outcome {
            ContactOutcome::Sent => Notice::QuerySent,
            ContactOutcome::Rejected(reason) => Notice::QueryRejected(reason.clone()),
            ContactOutcome::TransportFailed(_) => Notice::QueryNetworkError,
        };
        self.notifier.notify(&notice);
        Ok(Some(outcome))
    }

    /// HTTP transport for the configured endpoint
    ///
    /// # Errors
    /// - `UiError::Config` if the endpoint is not an http(s) URL or the
    ///   timeout is zero
    /// - `UiError::Transport` if the client cannot be built
    pub fn http_transport(config: &StorefrontConfig) -> Result<HttpTransport, UiError> {
        let endpoint = config.endpoint_url()?;
        let timeout = config.request_timeout()?;
        Ok(HttpTransport::new(endpoint, timeout)?)
    }

    fn after_mutation<T>(
        &mut self,
        result: Result<T, storefront_cart::CartError>,
    ) -> Result<T, UiError> {
        match result {
            Ok(value) => {
                self.rerender();
                Ok(value)
            }
            Err(e) => {
                if e.state_changed() {
                    self.rerender();
                }
                Err(e.into())
            }
        }
    }

    fn rerender(&mut self) {
        // Missing container is already logged by `require`.
        let _ = self.render();
    }
}

fn checkout_notice(error: &CheckoutError) -> Option<Notice> {
    match error {
        CheckoutError::MissingEmail => Some(Notice::MissingEmail),
        CheckoutError::EmptyCart => Some(Notice::EmptyCart),
        CheckoutError::InFlight => Some(Notice::CheckoutPending),
        CheckoutError::MissingCsrfToken => Some(Notice::MissingSecurityToken),
        CheckoutError::Cart(_) => None,
    }
}
