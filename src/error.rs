//! Terminal failures of the retry loop.

use crate::cancel::CancelCause;
use std::time::Duration;
use thiserror::Error;

/// Why a retry loop gave up.
///
/// Exactly one of these is produced per call, whichever condition triggers
/// first. The wrapped operation's own errors are never carried here; they
/// are visible only to the policy's `on_retry` observer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// External cancellation observed before an attempt began.
    #[error("retry cancelled at {attempts} attempt(s): {cause}")]
    Cancelled {
        /// Attempts counted when the signal was observed, including the
        /// iteration that was cut short.
        attempts: u32,
        /// Why the signal fired.
        cause: CancelCause,
    },

    /// The operation failed on the final permitted attempt.
    #[error("retry failed after {attempts} attempt(s) with total delay: {}s", total_delay.as_secs_f64())]
    AttemptsExhausted {
        /// Attempts performed, all failed.
        attempts: u32,
        /// Cumulative delay slept between attempts.
        total_delay: Duration,
    },

    /// The cumulative delay budget was spent before another attempt could
    /// be justified.
    #[error("retry failed after reaching timeout ({}s) with {attempts} attempt(s)", budget.as_secs_f64())]
    TimeoutBudget {
        /// The configured delay budget.
        budget: Duration,
        /// Attempts performed before the budget ran out.
        attempts: u32,
    },
}

impl RetryError {
    /// Number of attempts performed when the loop stopped.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Cancelled { attempts, .. }
            | Self::AttemptsExhausted { attempts, .. }
            | Self::TimeoutBudget { attempts, .. } => *attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_display() {
        let err = RetryError::AttemptsExhausted {
            attempts: 3,
            total_delay: Duration::from_millis(1500),
        };
        assert_eq!(
            err.to_string(),
            "retry failed after 3 attempt(s) with total delay: 1.5s"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = RetryError::TimeoutBudget {
            budget: Duration::from_secs(5),
            attempts: 4,
        };
        assert_eq!(
            err.to_string(),
            "retry failed after reaching timeout (5s) with 4 attempt(s)"
        );
    }

    #[test]
    fn test_cancelled_display() {
        let err = RetryError::Cancelled {
            attempts: 2,
            cause: CancelCause::DeadlineExceeded,
        };
        assert_eq!(
            err.to_string(),
            "retry cancelled at 2 attempt(s): deadline exceeded"
        );
    }

    #[test]
    fn test_attempts_accessor() {
        let err = RetryError::TimeoutBudget {
            budget: Duration::from_secs(5),
            attempts: 7,
        };
        assert_eq!(err.attempts(), 7);
    }
}
