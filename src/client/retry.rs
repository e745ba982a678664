//! Caller-side retry for rate-limited operations
//!
//! The client itself never retries; hosts that want automatic backoff wrap
//! individual calls with [`retry_on_rate_limit`] under a policy of their
//! choosing.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::error::Result;

/// Backoff policy for [`retry_on_rate_limit`]
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Re-invocations allowed after the initial attempt
    pub max_retries: u32,
    /// First sleep when the server sends no usable backoff hint
    pub base_delay: Duration,
    /// Upper bound on any single sleep
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Re-invoke `op` while it fails rate-limited.
///
/// Sleeps for the server's `Retry-After` hint when one is present (capped at
/// `max_delay`), otherwise doubles from `base_delay`. Every non-rate-limit
/// result passes through unchanged on the attempt it occurred. Once
/// `max_retries` re-invocations are exhausted, the final rate-limit error is
/// returned.
pub async fn retry_on_rate_limit<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.base_delay;
    let mut attempt = 0;

    loop {
        match op().await {
            Err(err) if err.is_rate_limited() => {
                if attempt >= policy.max_retries {
                    warn!(
                        "rate limit retries exhausted after {} attempts",
                        attempt + 1
                    );
                    return Err(err);
                }

                let delay = match err.retry_after() {
                    Some(hint) if !hint.is_zero() => hint.min(policy.max_delay),
                    _ => backoff,
                };
                debug!("rate limited, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;

                backoff = (backoff * 2).min(policy.max_delay);
                attempt += 1;
            }
            result => return result,
        }
    }
}
