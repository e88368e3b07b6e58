//! Cooperative cancellation signals.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Why cancellation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// The caller asked for the retries to stop.
    Cancelled,
    /// A caller-side deadline elapsed.
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// A signal the executor polls before each attempt.
///
/// Implementations only answer "has cancellation been requested" and "why".
/// The executor never subscribes to or blocks on the signal, so any
/// concurrency primitive can sit behind this trait.
pub trait CancelSignal: Send + Sync {
    /// Whether cancellation has been requested.
    fn is_cancelled(&self) -> bool;

    /// The cause to report once [`is_cancelled`](Self::is_cancelled)
    /// returns true.
    fn cause(&self) -> CancelCause;
}

const LIVE: u8 = 0;
const CANCELLED: u8 = 1;
const DEADLINE: u8 = 2;

/// Cheaply cloneable in-process cancellation flag.
///
/// All clones share one flag; cancelling any of them cancels the rest.
///
/// # Example
///
/// ```ignore
/// use retry_budget::{CancelHandle, CancelSignal};
///
/// let handle = CancelHandle::new();
/// let watcher = handle.clone();
/// handle.cancel();
/// assert!(watcher.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Create a live, uncancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation with [`CancelCause::Cancelled`].
    pub fn cancel(&self) {
        self.cancel_with(CancelCause::Cancelled);
    }

    /// Request cancellation with an explicit cause.
    ///
    /// Idempotent; the first recorded cause wins.
    pub fn cancel_with(&self, cause: CancelCause) {
        let next = match cause {
            CancelCause::Cancelled => CANCELLED,
            CancelCause::DeadlineExceeded => DEADLINE,
        };
        let _ = self
            .state
            .compare_exchange(LIVE, next, Ordering::AcqRel, Ordering::Acquire);
    }
}

impl CancelSignal for CancelHandle {
    fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) != LIVE
    }

    fn cause(&self) -> CancelCause {
        match self.state.load(Ordering::Acquire) {
            DEADLINE => CancelCause::DeadlineExceeded,
            _ => CancelCause::Cancelled,
        }
    }
}

/// Signal that never fires, for callers with no cancellation source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl CancelSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }

    fn cause(&self) -> CancelCause {
        CancelCause::Cancelled
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }

    fn cause(&self) -> CancelCause {
        CancelCause::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_starts_live() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_handle_clones_share_state() {
        let handle = CancelHandle::new();
        let watcher = handle.clone();

        handle.cancel();

        assert!(watcher.is_cancelled());
        assert_eq!(watcher.cause(), CancelCause::Cancelled);
    }

    #[test]
    fn test_first_cause_wins() {
        let handle = CancelHandle::new();
        handle.cancel_with(CancelCause::DeadlineExceeded);
        handle.cancel();

        assert_eq!(handle.cause(), CancelCause::DeadlineExceeded);
    }

    #[test]
    fn test_never_cancelled() {
        assert!(!NeverCancelled.is_cancelled());
    }

    #[test]
    fn test_cancellation_token_signal() {
        let token = CancellationToken::new();
        assert!(!CancelSignal::is_cancelled(&token));

        token.cancel();
        assert!(CancelSignal::is_cancelled(&token));
        assert_eq!(token.cause(), CancelCause::Cancelled);
    }

    #[test]
    fn test_cause_display() {
        assert_eq!(CancelCause::Cancelled.to_string(), "cancelled");
        assert_eq!(
            CancelCause::DeadlineExceeded.to_string(),
            "deadline exceeded"
        );
    }
}
