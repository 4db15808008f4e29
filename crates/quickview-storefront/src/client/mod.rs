//! HTTP client for the Shopify Storefront GraphQL endpoint.

mod catalog;

use std::time::Duration;

use quickview_core::StorefrontSettings;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorefrontError;
use crate::rate_limit::retry_with_backoff;
use crate::types::GraphQlResponse;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Client for the Shopify Storefront GraphQL API.
///
/// Rate limiting (429) and other non-2xx responses surface as typed errors.
/// Transient failures are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct StorefrontClient {
    client: Client,
    endpoint: Url,
    access_token: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

impl StorefrontClient {
    /// Creates a client from the configured storefront settings.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StorefrontError::InvalidEndpoint`] if the
    /// configured endpoint is not a URL.
    pub fn new(settings: &StorefrontSettings) -> Result<Self, StorefrontError> {
        Self::with_endpoint(
            &settings.endpoint,
            &settings.access_token,
            settings.request_timeout_secs,
            &settings.user_agent,
            settings.max_retries,
            settings.retry_backoff_base_ms,
        )
    }

    /// Creates a client against an explicit GraphQL endpoint (used with
    /// wiremock in tests).
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| StorefrontError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Runs one GraphQL query and returns its `data` payload.
    ///
    /// `context` names the operation in error messages and logs.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::RateLimited`]: HTTP 429 after all retries.
    /// - [`StorefrontError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`StorefrontError::Http`]: network or TLS failure after all retries.
    /// - [`StorefrontError::Deserialize`]: body does not match `T`.
    /// - [`StorefrontError::GraphQl`]: the response carried `errors`.
    /// - [`StorefrontError::MissingData`]: the response had no `data`.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        context: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, StorefrontError> {
        let body = GraphQlRequest { query, variables };

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(self.endpoint.clone())
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(StorefrontError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.to_string(),
                    });
                }

                let text = response.text().await?;
                parse_envelope(context, &text)
            }
        })
        .await
    }
}

/// Unwraps a GraphQL envelope into its `data` payload.
fn parse_envelope<T: DeserializeOwned>(context: &str, text: &str) -> Result<T, StorefrontError> {
    let envelope: GraphQlResponse<T> =
        serde_json::from_str(text).map_err(|e| StorefrontError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;

    if let Some(errors) = envelope.errors.filter(|errs| !errs.is_empty()) {
        let joined = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        tracing::warn!(context, errors = %joined, "storefront query returned errors");
        return Err(StorefrontError::GraphQl(joined));
    }

    envelope.data.ok_or_else(|| StorefrontError::MissingData {
        context: context.to_owned(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
