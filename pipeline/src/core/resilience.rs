//! Bounded retry for ledger finalization
//!
//! Used only on the commit path: once the provider has produced output the
//! debit must land, so transient ledger faults are retried with exponential
//! backoff before the request is surfaced for reconciliation. Provider
//! calls are never retried here (a retry is a new request with a fresh
//! reservation).

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::spi::LedgerError;

/// Execute a ledger operation, retrying transient failures.
///
/// Only [`LedgerError::Unavailable`] is retried; every other error is
/// final. Delays double per attempt from `initial_delay_ms`, capped at
/// `max_delay_ms`.
pub async fn with_ledger_retry<F, Fut, T>(
    max_retries: u32,
    initial_delay_ms: u64,
    max_delay_ms: u64,
    mut operation: F,
) -> Result<T, LedgerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LedgerError>>,
{
    let mut attempts: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempts += 1;

                if !e.is_transient() {
                    debug!(error = %e, "Non-transient ledger error, failing immediately");
                    return Err(e);
                }

                if attempts > max_retries {
                    warn!(
                        attempts,
                        max_retries,
                        error = %e,
                        "Ledger retries exhausted"
                    );
                    return Err(e);
                }

                // exponential backoff, shift capped to keep the math in range
                let exponent = (attempts - 1).min(16);
                let delay_ms = initial_delay_ms
                    .saturating_mul(1u64 << exponent)
                    .min(max_delay_ms);

                debug!(
                    attempt = attempts,
                    max_retries,
                    delay_ms,
                    error = %e,
                    "Retrying ledger operation after transient error"
                );

                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn success_on_first_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = with_ledger_retry(3, 1, 10, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, LedgerError>(42u64)
            }
        })
        .await;

        assert_eq!(result.expect("ok"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = with_ledger_retry(3, 1, 10, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                let count = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if count < 3 {
                    Err(LedgerError::Unavailable("connection reset".to_string()))
                } else {
                    Ok(7u64)
                }
            }
        })
        .await;

        assert_eq!(result.expect("ok"), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_terminal_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<u64, _> = with_ledger_retry(3, 1, 10, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LedgerError::UnknownReservation("gone".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<u64, _> = with_ledger_retry(2, 1, 10, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LedgerError::Unavailable("always down".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        // initial attempt + 2 retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
