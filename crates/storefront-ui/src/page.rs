//! Page bindings
//!
//! The set of page elements the session can reach, looked up once at the
//! boundary. Optional elements that are absent make their feature inert;
//! the cart container and the email input are required by render and
//! checkout respectively, and their absence is an error.

use crate::error::UiError;
use std::collections::BTreeSet;

/// Page element role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Search overlay toggle button
    SearchToggle,
    /// Cart overlay toggle button
    CartToggle,
    /// Menu overlay toggle button
    MenuToggle,
    /// Checkout button
    Checkout,
    /// Container the cart rows are rendered into
    CartContainer,
    /// Contact email input used at checkout
    EmailInput,
    /// Contact (query) form
    ContactForm,
    /// Hidden CSRF token field
    CsrfToken,
}

impl Role {
    /// Every role
    pub const ALL: [Role; 8] = [
        Role::SearchToggle,
        Role::CartToggle,
        Role::MenuToggle,
        Role::Checkout,
        Role::CartContainer,
        Role::EmailInput,
        Role::ContactForm,
        Role::CsrfToken,
    ];

    /// Selector of the element on the storefront page
    #[must_use]
    pub fn selector(self) -> &'static str {
        match self {
            Role::SearchToggle => "#search-btn",
            Role::CartToggle => "#cart-btn",
            Role::MenuToggle => "#menu-btn",
            Role::Checkout => "#checkout-btn",
            Role::CartContainer => "#cart-items",
            Role::EmailInput => "#email-input",
            Role::ContactForm => "#query-form",
            Role::CsrfToken => "[name=csrfmiddlewaretoken]",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

/// Elements present on the page, plus the values the session reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBindings {
    present: BTreeSet<Role>,
    email: String,
    csrf_token: Option<String>,
}

impl PageBindings {
    /// Page with no known elements
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Page with every element except the token value
    #[must_use]
    pub fn full() -> Self {
        Role::ALL.into_iter().fold(Self::empty(), Self::with)
    }

    /// With element present
    #[must_use]
    pub fn with(mut self, role: Role) -> Self {
        self.present.insert(role);
        self
    }

    /// With element absent
    #[must_use]
    pub fn without(mut self, role: Role) -> Self {
        self.present.remove(&role);
        if role == Role::CsrfToken {
            self.csrf_token = None;
        }
        self
    }

    /// With the hidden token field holding `token`
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.present.insert(Role::CsrfToken);
        self.csrf_token = Some(token.into());
        self
    }

    /// With the email input holding `email`
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.set_email(email);
        self
    }

    /// Check if an element is present
    #[inline]
    #[must_use]
    pub fn has(&self, role: Role) -> bool {
        self.present.contains(&role)
    }

    /// Fail if a required element is missing
    ///
    /// # Errors
    /// - `UiError::MissingElement`
    pub fn require(&self, role: Role) -> Result<(), UiError> {
        if self.has(role) {
            Ok(())
        } else {
            tracing::error!("Required page element not found: {}", role);
            Err(UiError::MissingElement(role))
        }
    }

    /// Replace the email input's value
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Email input value, `None` if the input is absent
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.has(Role::EmailInput).then_some(self.email.as_str())
    }

    /// Token field value, `None` if the field is absent
    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        if self.has(Role::CsrfToken) {
            self.csrf_token.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_has_every_role() {
        let page = PageBindings::full();
        assert!(Role::ALL.iter().all(|role| page.has(*role)));
    }

    #[test]
    fn require_reports_missing_role() {
        let page = PageBindings::full().without(Role::CartContainer);
        assert!(matches!(
            page.require(Role::CartContainer),
            Err(UiError::MissingElement(Role::CartContainer))
        ));
        assert!(page.require(Role::EmailInput).is_ok());
    }

    #[test]
    fn email_is_hidden_without_input() {
        let page = PageBindings::empty().with_email("a@example.com");
        assert_eq!(page.email(), None);
        assert_eq!(page.with(Role::EmailInput).email(), Some("a@example.com"));
    }

    #[test]
    fn removing_token_field_drops_token() {
        let page = PageBindings::empty().with_csrf_token("tok");
        assert_eq!(page.csrf_token(), Some("tok"));
        assert_eq!(page.without(Role::CsrfToken).csrf_token(), None);
    }

    #[test]
    fn role_displays_selector() {
        assert_eq!(Role::EmailInput.to_string(), "#email-input");
    }
}
