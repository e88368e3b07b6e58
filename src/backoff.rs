//! Delay computation between attempts.

use std::time::Duration;

/// Evolving inter-attempt delay for one retry loop.
///
/// Owns the current baseline delay. Jitter scales the baseline in place, so
/// jitter compounds across iterations instead of being re-rolled from the
/// original initial delay. Exponential growth doubles the baseline after
/// each applied delay and only affects the next iteration.
#[derive(Debug, Clone)]
pub struct DelayState {
    current: Duration,
    exponential: bool,
    jitter: bool,
}

impl DelayState {
    /// Start from the policy's initial delay.
    #[must_use]
    pub fn new(initial: Duration, exponential: bool, jitter: bool) -> Self {
        Self {
            current: initial,
            exponential,
            jitter,
        }
    }

    /// Compute the delay to apply before the next attempt and advance the
    /// baseline.
    ///
    /// With jitter enabled the baseline is first scaled by a uniform random
    /// factor in `[0.5, 1.5)`; the scaled value is both the applied delay
    /// and the new baseline. With exponential growth the baseline is then
    /// doubled, saturating at `Duration::MAX` (about 2^64 seconds, far
    /// beyond what any attempt or delay budget allows the loop to reach).
    pub fn next_delay(&mut self) -> Duration {
        if self.jitter {
            let factor = jitter_factor();
            self.current = Duration::from_secs_f64(self.current.as_secs_f64() * factor);
        }
        let applied = self.current;
        if self.exponential {
            self.current = self.current.saturating_mul(2);
        }
        applied
    }
}

/// Uniform random scaling factor in `[0.5, 1.5)`.
fn jitter_factor() -> f64 {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    rng.gen_range(0.5..1.5)
}
