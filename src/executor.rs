//! The retry loop.

use crate::backoff::DelayState;
use crate::cancel::CancelSignal;
use crate::error::RetryError;
use crate::policy::RetryPolicy;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Drive `operation` until it succeeds, polling `signal` before each
/// attempt and sleeping between attempts per `policy`.
///
/// The operation is opaque: every error it returns is treated as retryable
/// and never inspected beyond being handed to the policy's `on_retry`
/// observer. An operation that decides its own error is terminal must
/// suppress it and return `Ok(())`.
///
/// Two independent stopping conditions apply besides cancellation: the
/// attempt budget (`max_attempts`) and the delay budget (`timeout_budget`).
/// The delay budget is compared against delay already consumed at the point
/// of the check, so one more attempt may run even when the delay that
/// preceded it pushed consumption past the budget.
///
/// Cancellation is polled at the top of each iteration only; a signal fired
/// mid-sleep is observed once the sleep completes and the next iteration
/// begins. There is no timeout on the operation call itself — a hung
/// operation blocks the loop, and the delay budget never bounds execution
/// time.
///
/// # Example
///
/// ```ignore
/// use retry_budget::{execute, NeverCancelled, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(100))
///     .exponential(true)
///     .jitter(true);
///
/// execute(&NeverCancelled, &policy, || async {
///     unreliable_call().await
/// })
/// .await?;
/// ```
pub async fn execute<S, F, Fut>(
    signal: &S,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<(), RetryError>
where
    S: CancelSignal + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), anyhow::Error>>,
{
    let policy = policy.normalized();
    let mut attempts: u32 = 0;
    let mut total_delay = Duration::ZERO;
    let mut delay = DelayState::new(
        policy.initial_delay,
        policy.use_exponential,
        policy.use_jitter,
    );

    loop {
        attempts += 1;

        if signal.is_cancelled() {
            return Err(RetryError::Cancelled {
                attempts,
                cause: signal.cause(),
            });
        }

        let err = match operation().await {
            Ok(()) => {
                if attempts > 1 {
                    info!(attempts, "attempt succeeded after retries");
                }
                return Ok(());
            }
            Err(err) => err,
        };

        if let Some(on_retry) = &policy.on_retry {
            on_retry(attempts, total_delay, &err);
        }

        if attempts >= policy.max_attempts {
            return Err(RetryError::AttemptsExhausted {
                attempts,
                total_delay,
            });
        }
        if total_delay >= policy.timeout_budget {
            return Err(RetryError::TimeoutBudget {
                budget: policy.timeout_budget,
                attempts,
            });
        }

        let applied = delay.next_delay();
        total_delay += applied;

        debug!(
            attempts,
            wait_ms = applied.as_millis() as u64,
            error = %err,
            "waiting before retry"
        );
        sleep(applied).await;
    }
}

/// Borrowing wrapper for driving several call sites with one policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor<'a> {
    policy: &'a RetryPolicy,
}

impl<'a> RetryExecutor<'a> {
    /// Create an executor over a policy.
    #[must_use]
    pub fn new(policy: &'a RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run the operation under this executor's policy.
    pub async fn run<S, F, Fut>(&self, signal: &S, operation: F) -> Result<(), RetryError>
    where
        S: CancelSignal + ?Sized,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), anyhow::Error>>,
    {
        execute(signal, self.policy, operation).await
    }
}
