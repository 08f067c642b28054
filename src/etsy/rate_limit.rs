// Request throttling and retry for Etsy API calls.
//
// Etsy allows roughly 10 requests per second per API key. The throttle
// spaces requests at least `min_interval` apart, and `with_retry` retries
// rate-limited (429) and transient network failures with exponential
// backoff plus jitter. A server-provided Retry-After always wins over the
// computed backoff.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::warn;

use super::error::FetchError;

/// Default spacing between requests (10 QPS).
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Enforces a minimum interval between consecutive requests.
///
/// Cloning shares the underlying state, so every clone throttles together.
#[derive(Clone)]
pub struct RequestThrottle {
    inner: Arc<Mutex<ThrottleInner>>,
}

struct ThrottleInner {
    /// Minimum time between requests
    interval: Duration,
    /// When the last request was allowed through
    last_request: Option<Instant>,
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ThrottleInner {
                interval: min_interval,
                last_request: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if let Some(last) = inner.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < inner.interval {
                let sleep_time = inner.interval - elapsed;
                // Lock is held across the sleep: callers go through one
                // interval apart, in arrival order.
                tokio::time::sleep(sleep_time).await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}

/// Backoff parameters for [`with_retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_backoff: Duration,
    /// Cap on the computed backoff.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based), without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Scale a delay by a factor in [0.75, 1.25) so parallel callers don't
/// retry in lockstep. The nanosecond clock is random enough for this.
fn jitter(delay: Duration) -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let factor = 0.75 + f64::from(nanos % 500) / 1000.0;
    Duration::from_secs_f64(delay.as_secs_f64() * factor)
}

/// Run `operation`, retrying transient failures according to `policy`.
///
/// The throttle is acquired before every attempt, retries included.
/// Non-transient errors (not found, auth, malformed) are returned at once.
pub async fn with_retry<F, Fut, T>(
    throttle: &RequestThrottle,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        throttle.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= policy.max_retries {
                    return Err(err);
                }

                attempt += 1;
                let delay = err
                    .retry_after()
                    .unwrap_or_else(|| jitter(policy.backoff(attempt)));

                warn!(
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying Etsy request"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
