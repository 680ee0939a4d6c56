//! Fixed-delay retry for rate-limited ad library requests.
//!
//! Only HTTP 429 ([`ClientError::RateLimited`]) is retried. Every other error
//! is returned on the first occurrence so the caller can decide how far to
//! unwind (the collector abandons the current date chunk).

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

fn is_rate_limited(err: &ClientError) -> bool {
    matches!(err, ClientError::RateLimited { .. })
}

/// Executes `operation`, retrying with the same arguments after `backoff`
/// whenever it is rate limited.
///
/// The delay is fixed; it does not grow between attempts. With
/// `max_retries = None` the retry is unbounded and the call only returns
/// once the rate-limit signal clears or a different error occurs. With
/// `Some(n)` at most `n` retries follow the first attempt, after which the
/// last [`ClientError::RateLimited`] is returned.
///
/// # Errors
///
/// Returns the first non-rate-limit error, or the final rate-limit error
/// once a configured retry cap is exhausted.
pub async fn retry_rate_limited<T, F, Fut>(
    backoff: Duration,
    max_retries: Option<u32>,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retries = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_rate_limited(&err) || max_retries.is_some_and(|cap| retries >= cap) {
                    return Err(err);
                }
                retries = retries.saturating_add(1);
                tracing::warn!(
                    retries,
                    ?max_retries,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "rate limited; waiting before retrying the same request"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ClientError {
        ClientError::RateLimited {
            endpoint: "ad/query".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_rate_limited(Duration::ZERO, None, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ClientError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unbounded_retry_eventually_proceeds_once_signal_clears() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_rate_limited(Duration::ZERO, None, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 25 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ClientError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 26);
    }

    #[tokio::test]
    async fn capped_retry_returns_last_rate_limit_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_rate_limited(Duration::ZERO, Some(2), || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ClientError>(rate_limited())
            }
        })
        .await;
        // cap of 2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ClientError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_rate_limited(Duration::ZERO, None, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ClientError>(ClientError::UnexpectedStatus {
                    status: 500,
                    url: "https://open.tiktokapis.com/v2/research/adlib/ad/query/".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
