// src/places/retry.rs - bounded retry combinator for provider calls
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::ProviderError;

/// Attempt budget for text-search pages.
pub const SEARCH_ATTEMPTS: u32 = 3;
/// Attempt budget for detail fetches.
pub const DETAIL_ATTEMPTS: u32 = 4;
/// Backoff grows linearly: base × (attempt + 1).
pub const BACKOFF_BASE: Duration = Duration::from_millis(1250);

/// Runs `op` up to `max_attempts` times, retrying only transient failures.
/// On exhaustion the last observed transient error is returned as-is, so
/// callers can still tell it apart from a permanent failure.
pub async fn retry_request<T, F, Fut>(
    mut op: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let delay = base_delay * (attempt + 1);
                debug!(
                    "Transient failure on attempt {}/{}, retrying in {:?}: {}",
                    attempt + 1,
                    max_attempts,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
