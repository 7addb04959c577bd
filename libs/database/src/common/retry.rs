use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for establishing store connections at startup.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,

    /// Growth factor applied after each failed retry
    pub backoff_multiplier: f64,

    /// Randomize each delay between 50% and 100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 5 retries, 200ms initial delay, 5s cap, doubling, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Nominal delay before retry number `retry` (1-based), before jitter.
    pub fn nominal_delay_ms(&self, retry: u32) -> u64 {
        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        ((self.initial_delay_ms as f64 * factor) as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Runs `operation` until it succeeds or the retry budget is spent.
///
/// The last error is returned unchanged once `max_retries` is exhausted.
///
/// ```ignore
/// let db = retry_with_backoff(|| connect_with_options(opts.clone()), RetryConfig::new()).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if retry > 0 {
                    debug!("Operation succeeded after {} retries", retry);
                }
                return Ok(result);
            }
            Err(e) if retry >= config.max_retries => {
                warn!("Operation failed after {} attempts: {}", retry + 1, e);
                return Err(e);
            }
            Err(e) => {
                retry += 1;
                let nominal = config.nominal_delay_ms(retry);
                let delay = if config.use_jitter {
                    apply_jitter(nominal)
                } else {
                    nominal
                };

                warn!(
                    "Operation failed (retry {}/{}): {}. Retrying in {}ms",
                    retry, config.max_retries, e, delay
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}

/// Scales `delay` by a pseudo-random factor in [0.5, 1.0).
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor = (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;
    (delay as f64 * factor) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_nominal_delay_grows_and_caps() {
        let config = RetryConfig::new().with_initial_delay(100).with_max_delay(350);
        assert_eq!(config.nominal_delay_ms(1), 100);
        assert_eq!(config.nominal_delay_ms(2), 200);
        assert_eq!(config.nominal_delay_ms(3), 350);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        for _ in 0..20 {
            let delay = apply_jitter(1000);
            assert!((500..1000).contains(&delay));
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = retry_with_backoff(
            || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("connection refused".to_string())
                    } else {
                        Ok("connected")
                    }
                }
            },
            RetryConfig::new().with_initial_delay(1).without_jitter(),
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), String> = retry_with_backoff(
            || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Err(format!("attempt {n}"))
                }
            },
            RetryConfig::new()
                .with_max_retries(2)
                .with_initial_delay(1)
                .without_jitter(),
        )
        .await;

        assert_eq!(result.unwrap_err(), "attempt 2");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
