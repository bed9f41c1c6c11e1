//! Bounded retry with exponential backoff for idempotent node HTTP calls.
//!
//! Retries only transient transport errors on read-only requests (view
//! queries, inclusion and head polls). Signed submissions are never
//! routed through here — a second injection of a signed operation would
//! be a second operation.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles per attempt (200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Run an idempotent request up to `MAX_RETRIES + 1` times, backing off
/// exponentially between attempts.
///
/// Any `Err` from `request` counts as a transport failure and is retried;
/// the caller inspects response statuses itself. The last attempt's error
/// is returned verbatim.
pub(crate) async fn retry_send<T, E, F, Fut>(request: F) -> Result<T, E>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = Duration::from_millis(BASE_DELAY_MS);
    for attempt in 1..=MAX_RETRIES {
        match request().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_retries = MAX_RETRIES,
                    "node HTTP request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
    request().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn exhausts_all_attempts_on_persistent_transport_failure() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_send(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("connection refused (attempt {attempt})")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_backing_off_on_first_success() {
        let calls = AtomicU32::new(0);

        let result = retry_send(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err("connection reset".to_string())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_makes_one_call() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = retry_send(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
