use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_base_url: String,
    pub collection_handle: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub cta_confirm_delay_ms: u64,
    pub cta_dismiss_delay_ms: u64,
    pub shopify_store_domain: Option<String>,
    pub shopify_storefront_token: Option<String>,
    pub shopify_api_version: String,
}

/// Everything the storefront GraphQL client needs to reach the shop.
#[derive(Clone)]
pub struct StorefrontSettings {
    pub endpoint: String,
    pub access_token: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl AppConfig {
    /// Builds the storefront client settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `SHOPIFY_STORE_DOMAIN` or
    /// `SHOPIFY_STOREFRONT_ACCESS_TOKEN` was not provided.
    pub fn storefront(&self) -> Result<StorefrontSettings, ConfigError> {
        let domain = self
            .shopify_store_domain
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE_DOMAIN".to_string()))?;
        let access_token = self.shopify_storefront_token.clone().ok_or_else(|| {
            ConfigError::MissingEnvVar("SHOPIFY_STOREFRONT_ACCESS_TOKEN".to_string())
        })?;

        let host = domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        Ok(StorefrontSettings {
            endpoint: format!(
                "https://{host}/api/{}/graphql.json",
                self.shopify_api_version
            ),
            access_token,
            request_timeout_secs: self.request_timeout_secs,
            user_agent: self.user_agent.clone(),
            max_retries: self.max_retries,
            retry_backoff_base_ms: self.retry_backoff_base_ms,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("collection_handle", &self.collection_handle)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("cta_confirm_delay_ms", &self.cta_confirm_delay_ms)
            .field("cta_dismiss_delay_ms", &self.cta_dismiss_delay_ms)
            .field("shopify_store_domain", &self.shopify_store_domain)
            .field(
                "shopify_storefront_token",
                &self.shopify_storefront_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .finish()
    }
}

impl std::fmt::Debug for StorefrontSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSettings")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"[redacted]")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
