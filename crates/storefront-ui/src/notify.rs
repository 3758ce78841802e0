//! User-visible notifications
//!
//! Each notice is a blocking message shown on its own; nothing is queued.

use std::fmt;

/// Message shown to the shopper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Backend accepted the order
    OrderPlaced,
    /// Checkout attempted with a blank email
    MissingEmail,
    /// Checkout attempted with nothing in the cart
    EmptyCart,
    /// Checkout clicked while an order is outstanding
    CheckoutPending,
    /// Page has no CSRF token to send
    MissingSecurityToken,
    /// Backend refused the order
    OrderRejected(String),
    /// Order never reached the backend
    OrderNetworkError,
    /// Contact query delivered
    QuerySent,
    /// Backend refused the contact query
    QueryRejected(String),
    /// Contact query never reached the backend
    QueryNetworkError,
}

impl Notice {
    /// Check if the notice reports a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::OrderPlaced | Self::QuerySent)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderPlaced => f.write_str(
                "Order placed successfully! Please wait for a response from us through mail",
            ),
            Self::MissingEmail => f.write_str("Please enter a valid email address."),
            Self::EmptyCart => f.write_str("Your cart is empty!"),
            Self::CheckoutPending => f.write_str("Your order is already being placed."),
            Self::MissingSecurityToken => {
                f.write_str("Security token missing. Please reload the page.")
            }
            Self::OrderRejected(reason) | Self::QueryRejected(reason) => {
                write!(f, "Error: {reason}")
            }
            Self::OrderNetworkError | Self::QueryNetworkError => {
                f.write_str("Network error! Please try again.")
            }
            Self::QuerySent => f.write_str("Query sent successfully!"),
        }
    }
}

/// Shows notices to the shopper
pub trait Notifier: Send + Sync {
    /// Show one notice
    fn notify(&self, notice: &Notice);
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            tracing::warn!("{}", notice);
        } else {
            tracing::info!("{}", notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Notice::EmptyCart.to_string(), "Your cart is empty!");
        assert_eq!(
            Notice::OrderRejected("Missing email or message".into()).to_string(),
            "Error: Missing email or message"
        );
        assert!(!Notice::QuerySent.is_error());
        assert!(Notice::QueryNetworkError.is_error());
    }
}
