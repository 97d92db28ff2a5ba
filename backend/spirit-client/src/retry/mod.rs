//! Exponential backoff with bounded positive jitter, and the caller-level
//! retry loop built on it.

use crate::error::{ClientError, ErrorContext};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use log::{debug, warn};
use rand::Rng;
use tokio::time::sleep as TokioSleep;

pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Upper bound (exclusive) of the jitter fraction.
pub const MAX_JITTER: f64 = 0.3;

/// Source of the jitter fraction in `[0, MAX_JITTER)`.
pub trait JitterSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..MAX_JITTER)
    }
}

/// Constant jitter, clamped into range. Used to pin delays.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0.clamp(0.0, MAX_JITTER)
    }
}

#[derive(Clone)]
pub struct RetryPolicy {
    base: Duration,
    max: Duration,
    multiplier: f64,
    max_attempts: u32,
    jitter: Arc<dyn JitterSource>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_DELAY,
            max: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            jitter: Arc::new(RandomJitter),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("base", &self.base)
            .field("max", &self.max)
            .field("multiplier", &self.multiplier)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = max;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(1.0);
        self
    }

    /// At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn max_delay(&self) -> Duration {
        self.max
    }

    /// `base * multiplier^(attempt-1)` in milliseconds, before jitter and cap.
    pub fn base_delay_ms(&self, attempt: u32) -> f64 {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        self.base.as_millis() as f64 * self.multiplier.powi(exponent)
    }

    /// `min(base * multiplier^(attempt-1) * (1 + jitter), max)`. Attempt 0 is treated as 1.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let jittered = self.base_delay_ms(attempt.max(1)) * (1.0 + self.jitter.sample());
        let capped = jittered.min(self.max.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Fresh backoff sequence yielding `max_attempts - 1` delays.
    pub fn backoff(&self) -> JitteredBackoff {
        JitteredBackoff {
            policy: self.clone(),
            attempt: 0,
        }
    }
}

/// [`RetryPolicy`] as a [`Backoff`]. Returns `None` once the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct JitteredBackoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl JitteredBackoff {
    /// Number of failed attempts recorded so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl Backoff for JitteredBackoff {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.policy.max_attempts {
            return None;
        }
        Some(self.policy.delay_for_attempt(self.attempt))
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's attempt budget is spent.
///
/// Attempts run one after another; the only suspension between them is the
/// backoff sleep. Configuration errors are returned immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    context: ErrorContext,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let label = context.operation().unwrap_or("operation").to_string();
    let mut backoff = policy.backoff();

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(ClientError::Spiritual(error)) => error,
            Err(other) => return Err(other),
        };

        let attempt = backoff.attempt() + 1;

        if !error.retryable {
            debug!("{label}: {} error is not retryable, giving up", error.kind);
            return Err(ClientError::Spiritual(error));
        }

        match backoff.next_backoff() {
            Some(delay) => {
                let delay = error.retry_after.unwrap_or(delay);
                warn!(
                    "{label}: attempt {attempt}/{} failed ({}), retrying in {delay:?}",
                    policy.max_attempts(),
                    error.kind
                );
                TokioSleep(delay).await;
            }
            None => {
                warn!("{label}: giving up after {attempt} attempts");
                return Err(ClientError::Spiritual(error));
            }
        }
    }
}
