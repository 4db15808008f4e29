//! Retry with exponential backoff for Storefront API calls.
//!
//! Transient failures (429, network errors, 5xx) are retried with jittered
//! exponential backoff. GraphQL errors, missing data and parse failures are
//! propagated immediately since repeating the same query will not fix them.

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
fn is_retriable(err: &StorefrontError) -> bool {
    match err {
        StorefrontError::RateLimited { .. } | StorefrontError::Http(_) => true,
        StorefrontError::UnexpectedStatus { status, .. } => *status >= 500,
        StorefrontError::Deserialize { .. }
        | StorefrontError::GraphQl(_)
        | StorefrontError::MissingData { .. }
        | StorefrontError::InvalidEndpoint { .. } => false,
    }
}

/// Executes `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// | Attempt | Sleep before next attempt (`backoff_base_ms = 500`) |
/// |---------|------------------------------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 %                                   |
/// | 2       | 500 ms × 2¹ ± 25 %                                   |
/// | 3       | 500 ms × 2² ± 25 %                                   |
///
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient storefront error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
