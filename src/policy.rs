//! Retry policy configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default attempt budget applied when `max_attempts` is unset.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default delay before the second attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Default ceiling on cumulative delay.
pub const DEFAULT_TIMEOUT_BUDGET: Duration = Duration::from_secs(5);

/// Observer invoked synchronously after each failed attempt, before that
/// attempt's delay is applied.
///
/// Receives the attempt number (1-indexed), the delay consumed by prior
/// iterations (excluding the delay about to be applied), and the error the
/// attempt returned.
pub type OnRetry = Arc<dyn Fn(u32, Duration, &anyhow::Error) + Send + Sync>;

/// Configuration for one retry loop.
///
/// Zero values mean "unset": the executor fills them with defaults via
/// [`normalized`](Self::normalized) before the loop starts, so
/// `RetryPolicy::default()` behaves as max 3 attempts, 1s initial delay and
/// a 5s delay budget.
///
/// # Example
///
/// ```ignore
/// use retry_budget::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(100))
///     .exponential(true)
///     .jitter(true);
/// ```
#[derive(Clone, Default)]
pub struct RetryPolicy {
    /// Maximum number of times the operation may be invoked; the first
    /// invocation counts as attempt 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Ceiling on the cumulative delay slept between attempts.
    ///
    /// Bounds sleeping only, never wall-clock time since the call started
    /// and never time spent inside the operation.
    pub timeout_budget: Duration,
    /// Double the delay after each attempt.
    pub use_exponential: bool,
    /// Scale each delay by a fresh uniform random factor in `[0.5, 1.5)`.
    pub use_jitter: bool,
    /// Observer for failed attempts.
    pub on_retry: Option<OnRetry>,
}

impl RetryPolicy {
    /// Create a policy with every field unset (defaults apply at run time).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget.
    #[must_use]
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the delay before the second attempt.
    #[must_use]
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_delay = d;
        self
    }

    /// Set the ceiling on cumulative delay.
    #[must_use]
    pub fn timeout_budget(mut self, d: Duration) -> Self {
        self.timeout_budget = d;
        self
    }

    /// Enable or disable exponential backoff.
    #[must_use]
    pub fn exponential(mut self, enabled: bool) -> Self {
        self.use_exponential = enabled;
        self
    }

    /// Enable or disable jitter.
    #[must_use]
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.use_jitter = enabled;
        self
    }

    /// Set the failed-attempt observer.
    ///
    /// Invoked synchronously; the executor makes no assumptions about its
    /// side effects.
    #[must_use]
    pub fn on_retry(
        mut self,
        observer: impl Fn(u32, Duration, &anyhow::Error) + Send + Sync + 'static,
    ) -> Self {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    /// Copy of this policy with zero fields replaced by their defaults.
    ///
    /// Durations are unsigned, so zero is the only "non-positive" value a
    /// field can hold.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut policy = self.clone();
        if policy.max_attempts == 0 {
            policy.max_attempts = DEFAULT_MAX_ATTEMPTS;
        }
        if policy.initial_delay.is_zero() {
            policy.initial_delay = DEFAULT_INITIAL_DELAY;
        }
        if policy.timeout_budget.is_zero() {
            policy.timeout_budget = DEFAULT_TIMEOUT_BUDGET;
        }
        policy
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("timeout_budget", &self.timeout_budget)
            .field("use_exponential", &self.use_exponential)
            .field("use_jitter", &self.use_jitter)
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builder_chain() {
        let policy = RetryPolicy::new()
            .max_attempts(5)
            .initial_delay(Duration::from_millis(100))
            .timeout_budget(Duration::from_secs(30))
            .exponential(true)
            .jitter(true);

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.timeout_budget, Duration::from_secs(30));
        assert!(policy.use_exponential);
        assert!(policy.use_jitter);
        assert!(policy.on_retry.is_none());
    }

    #[rstest]
    #[case(0, DEFAULT_MAX_ATTEMPTS)]
    #[case(1, 1)]
    #[case(10, 10)]
    fn test_normalized_max_attempts(#[case] configured: u32, #[case] expected: u32) {
        let policy = RetryPolicy::new().max_attempts(configured).normalized();
        assert_eq!(policy.max_attempts, expected);
    }

    #[test]
    fn test_normalized_fills_zero_durations() {
        let policy = RetryPolicy::new().normalized();

        assert_eq!(policy.initial_delay, DEFAULT_INITIAL_DELAY);
        assert_eq!(policy.timeout_budget, DEFAULT_TIMEOUT_BUDGET);
    }

    #[test]
    fn test_normalized_keeps_set_values() {
        let policy = RetryPolicy::new()
            .initial_delay(Duration::from_millis(10))
            .timeout_budget(Duration::from_millis(50))
            .normalized();

        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        assert_eq!(policy.timeout_budget, Duration::from_millis(50));
    }

    #[test]
    fn test_debug_hides_observer() {
        let policy = RetryPolicy::new().on_retry(|_, _, _| {});
        let rendered = format!("{policy:?}");

        assert!(rendered.contains("on_retry: true"));
    }
}
