use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it when the
/// caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("QUICKVIEW_ENV", "development"))?;

    let bind_addr = parse_addr("QUICKVIEW_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("QUICKVIEW_LOG_LEVEL", "info");
    let api_base_url = or_default("QUICKVIEW_API_BASE_URL", "http://127.0.0.1:3000");
    let collection_handle = or_default("QUICKVIEW_COLLECTION_HANDLE", "all");
    if collection_handle.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "QUICKVIEW_COLLECTION_HANDLE".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("QUICKVIEW_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("QUICKVIEW_USER_AGENT", "quickview/0.1 (storefront)");
    let max_retries = parse_u32("QUICKVIEW_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("QUICKVIEW_RETRY_BACKOFF_BASE_MS", "500")?;
    let cta_confirm_delay_ms = parse_u64("QUICKVIEW_CTA_CONFIRM_DELAY_MS", "1000")?;
    let cta_dismiss_delay_ms = parse_u64("QUICKVIEW_CTA_DISMISS_DELAY_MS", "1200")?;

    let shopify_store_domain = lookup("SHOPIFY_STORE_DOMAIN")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let shopify_storefront_token = lookup("SHOPIFY_STOREFRONT_ACCESS_TOKEN")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2025-01");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_base_url,
        collection_handle,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        cta_confirm_delay_ms,
        cta_dismiss_delay_ms,
        shopify_store_domain,
        shopify_storefront_token,
        shopify_api_version,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "QUICKVIEW_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
