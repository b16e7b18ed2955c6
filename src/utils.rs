//! Utility functions shared by the bot layer.

use crate::bot::transport::TransportError;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Truncates a string to at most `max_chars` characters, respecting char boundaries.
///
/// # Examples
///
/// ```
/// use kb_navigator::utils::truncate_str;
/// assert_eq!(truncate_str("Привет, мир!", 6), "Привет");
/// ```
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Runs a Telegram API operation, retrying transient failures.
///
/// Uses exponential backoff with jitter. Only errors for which
/// [`TransportError::is_transient`] holds are retried; everything else is
/// returned immediately. After a flood-control error the next attempt
/// additionally waits for the delay Telegram asked for.
///
/// # Errors
///
/// Returns the last error once retries are exhausted or a permanent error occurs.
pub async fn retry_telegram_operation<F, Fut, T>(mut operation: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    use crate::config::{
        TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
    };

    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter)
        .take(TELEGRAM_API_MAX_RETRIES);

    // Millis still owed to flood control before the next attempt
    let flood_wait = AtomicU64::new(0);
    let flood_wait = &flood_wait;

    let attempt = move || {
        let wait = Duration::from_millis(flood_wait.swap(0, Ordering::SeqCst));
        let fut = operation();
        async move {
            if !wait.is_zero() {
                debug!("Waiting {:?} for Telegram flood control", wait);
                tokio::time::sleep(wait).await;
            }
            let result = fut.await;
            if let Err(TransportError::RetryAfter(delay)) = &result {
                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                flood_wait.store(millis, Ordering::SeqCst);
            }
            result
        }
    };

    RetryIf::spawn(retry_strategy, attempt, TransportError::is_transient)
        .await
        .inspect_err(|e| {
            if e.is_transient() {
                warn!(
                    "Telegram API operation failed after {} retries: {}",
                    TELEGRAM_API_MAX_RETRIES, e
                );
            }
        })
}
