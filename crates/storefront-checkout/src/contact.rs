//! Contact form pass-through
//!
//! The form is posted exactly as filled in, token field included, to the
//! same query endpoint used for orders. It holds no state beyond its fields.

use crate::error::{CheckoutError, TransportError};
use crate::submitter::UNKNOWN_REJECTION;
use crate::transport::{QueryRequest, QueryTransport};
use indexmap::IndexMap;

/// Hidden form field holding the CSRF token
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// How a contact submission ended
#[derive(Debug)]
pub enum ContactOutcome {
    /// Query delivered; the form was reset
    Sent,
    /// Backend refused the query
    Rejected(String),
    /// No usable answer
    TransportFailed(TransportError),
}

/// Contact form fields in page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    fields: IndexMap<String, String>,
}

impl ContactForm {
    /// Create empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a field value
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Set a field, keeping its original position if it already exists
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Field value
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// CSRF token carried by the hidden field, if non-blank
    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        self.field(CSRF_FIELD)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Clear every visible field; the hidden token survives
    pub fn reset(&mut self) {
        for (name, value) in &mut self.fields {
            if name != CSRF_FIELD {
                value.clear();
            }
        }
    }

    /// Post the form; resets it when the backend accepts
    ///
    /// # Errors
    /// - `CheckoutError::MissingCsrfToken` before any network call
    pub async fn submit(
        &mut self,
        transport: &dyn QueryTransport,
    ) -> Result<ContactOutcome, CheckoutError> {
        let csrf_token = self
            .csrf_token()
            .ok_or(CheckoutError::MissingCsrfToken)?
            .to_string();
        let request = QueryRequest {
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            csrf_token,
        };

        let outcome = match transport.send_query(request).await {
            Ok(response) if response.success => {
                self.reset();
                ContactOutcome::Sent
            }
            Ok(response) => {
                let reason = response
                    .error
                    .unwrap_or_else(|| UNKNOWN_REJECTION.to_string());
                tracing::warn!("Contact query rejected: {}", reason);
                ContactOutcome::Rejected(reason)
            }
            Err(e) => {
                tracing::error!("Contact query failed: {}", e);
                ContactOutcome::TransportFailed(e)
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockQueryTransport, QueryResponse};

    fn filled_form() -> ContactForm {
        ContactForm::new()
            .with_field(CSRF_FIELD, "tok")
            .with_field("email", "someone@example.com")
            .with_field("message", "Do you stock M8 bolts?")
    }

    #[tokio::test]
    async fn sends_every_field_and_resets_on_success() {
        let mut form = filled_form();
        let mut transport = MockQueryTransport::new();
        transport
            .expect_send_query()
            .withf(|request| {
                request.csrf_token == "tok"
                    && request.fields.len() == 3
                    && request.field(CSRF_FIELD) == Some("tok")
                    && request.field("message") == Some("Do you stock M8 bolts?")
            })
            .times(1)
            .returning(|_| Ok(QueryResponse::accepted()));

        let outcome = form.submit(&transport).await.unwrap();

        assert!(matches!(outcome, ContactOutcome::Sent));
        assert_eq!(form.field("email"), Some(""));
        assert_eq!(form.field("message"), Some(""));
        assert_eq!(form.csrf_token(), Some("tok"));
    }

    #[tokio::test]
    async fn rejection_keeps_form_and_falls_back_to_generic_reason() {
        let mut form = filled_form();
        let mut transport = MockQueryTransport::new();
        transport
            .expect_send_query()
            .returning(|_| Ok(QueryResponse::default()));

        let outcome = form.submit(&transport).await.unwrap();

        assert!(matches!(outcome, ContactOutcome::Rejected(reason) if reason == UNKNOWN_REJECTION));
        assert_eq!(form, filled_form());
    }

    #[tokio::test]
    async fn missing_token_never_hits_network() {
        let mut form = ContactForm::new().with_field("email", "x@example.com");
        let mut transport = MockQueryTransport::new();
        transport.expect_send_query().times(0);

        let result = form.submit(&transport).await;
        assert!(matches!(result, Err(CheckoutError::MissingCsrfToken)));
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let mut form = filled_form();
        let mut transport = MockQueryTransport::new();
        transport
            .expect_send_query()
            .returning(|_| Err(TransportError::Unreachable("dns".into())));

        let outcome = form.submit(&transport).await.unwrap();
        assert!(matches!(outcome, ContactOutcome::TransportFailed(_)));
    }

    #[test]
    fn set_field_keeps_position() {
        let mut form = filled_form();
        form.set_field("email", "other@example.com");
        let names: Vec<&str> = form.fields().map(|(k, _)| k).collect();
        assert_eq!(names, [CSRF_FIELD, "email", "message"]);
    }
}
