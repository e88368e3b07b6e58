//! # retry-budget
//!
//! Budgeted, cancellable retry executor for fallible async operations.
//!
//! Attempts run strictly sequentially under a [`RetryPolicy`] until the
//! operation succeeds, the attempt budget is exhausted, the cumulative
//! delay budget is spent, or an external [`CancelSignal`] fires.
//!
//! ## Core Concepts
//!
//! - **[`RetryPolicy`]**: Configure attempt and delay budgets, backoff and
//!   jitter, and the failed-attempt observer
//! - **[`CancelSignal`]**: Poll-only cooperative cancellation, with
//!   [`CancelHandle`] and `tokio_util`'s `CancellationToken` as sources
//! - **[`execute`]**: Drive an operation to success under a policy
//! - **[`RetryError`]**: The three terminal outcomes of a failed loop
//!
//! The executor never classifies errors: every failure the operation
//! returns is retried. An operation that considers its own error terminal
//! suppresses it and returns `Ok(())` instead.
//!
//! ## Example
//!
//! ```ignore
//! use retry_budget::{execute, NeverCancelled, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new()
//!     .max_attempts(5)
//!     .initial_delay(Duration::from_millis(100))
//!     .timeout_budget(Duration::from_secs(10))
//!     .exponential(true)
//!     .jitter(true);
//!
//! execute(&NeverCancelled, &policy, || async {
//!     unreliable_call().await
//! })
//! .await?;
//! ```
//!
//! ## Cancellation
//!
//! ```ignore
//! use retry_budget::{execute, CancelHandle, RetryPolicy};
//!
//! let handle = CancelHandle::new();
//! let stopper = handle.clone();
//! // stopper.cancel() from elsewhere ends the loop before its next attempt.
//! let result = execute(&handle, &RetryPolicy::default(), || async {
//!     unreliable_call().await
//! })
//! .await;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod cancel;
pub mod error;
pub mod executor;
pub mod policy;

// Re-exports
pub use backoff::DelayState;
pub use cancel::{CancelCause, CancelHandle, CancelSignal, NeverCancelled};
pub use error::RetryError;
pub use executor::{execute, RetryExecutor};
pub use policy::{OnRetry, RetryPolicy};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        execute, CancelCause, CancelHandle, CancelSignal, NeverCancelled, RetryError,
        RetryExecutor, RetryPolicy,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let policy = RetryPolicy::new().max_attempts(5);
        assert_eq!(policy.max_attempts, 5);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default().normalized();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.timeout_budget, Duration::from_secs(5));
    }

    #[test]
    fn test_delay_state_reexport() {
        let mut state = DelayState::new(Duration::from_millis(5), false, false);
        assert_eq!(state.next_delay(), Duration::from_millis(5));
    }
}
