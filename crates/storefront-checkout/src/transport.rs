//! Query endpoint transport
//!
//! One POST per call, multipart body, CSRF token in the `X-CSRFToken`
//! header. The backend answers rejections with 4xx/5xx statuses and the
//! same JSON body as successes, so the body is decoded regardless of
//! status.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the CSRF token
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Form fields in submission order
    pub fields: Vec<(String, String)>,
    /// Token sent in [`CSRF_HEADER`]
    pub csrf_token: String,
}

impl QueryRequest {
    /// Value of the first field with this name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Backend verdict
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Whether the backend accepted the submission
    pub success: bool,
    /// Rejection reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational message on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResponse {
    /// Accepted response
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Rejected response with a reason
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Sends form submissions to the query endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Submit one request and decode the verdict
    ///
    /// # Errors
    /// - `TransportError` if no decodable answer was received
    async fn send_query(&self, request: QueryRequest) -> Result<QueryResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create transport posting to `endpoint`
    ///
    /// # Errors
    /// - `TransportError::Request` if the HTTP client cannot be built
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn send_query(&self, request: QueryRequest) -> Result<QueryResponse, TransportError> {
        let form = request
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CSRF_HEADER, request.csrf_token)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::from_request)?;

        let status = response.status();
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| TransportError::MalformedResponse {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_decodes_minimal_payloads() {
        let ok: QueryResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(ok, QueryResponse::accepted());

        let err: QueryResponse =
            serde_json::from_str(r#"{"success": false, "error": "Missing email or message"}"#)
                .unwrap();
        assert_eq!(err, QueryResponse::rejected("Missing email or message"));
    }

    #[test]
    fn response_keeps_success_message() {
        let ok: QueryResponse =
            serde_json::from_str(r#"{"success": true, "message": "Email sent successfully!"}"#)
                .unwrap();
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("Email sent successfully!"));
    }

    #[test]
    fn request_field_lookup() {
        let request = QueryRequest {
            fields: vec![("email".into(), "a@b.c".into())],
            csrf_token: "t".into(),
        };
        assert_eq!(request.field("email"), Some("a@b.c"));
        assert_eq!(request.field("message"), None);
    }
}
