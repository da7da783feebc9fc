use std::time::Duration;

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Budget exhausted; surface the last failure.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-delay retry budget.
///
/// The same `delay` separates every pair of attempts; it never grows and is
/// never randomized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). `0` behaves like `1`:
    /// the first call always happens before the budget is consulted.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Decide what to do once an attempt has failed and the budget has been
    /// decremented to `remaining`.
    pub fn decide(&self, remaining: u32) -> RetryDecision {
        if remaining > 0 {
            RetryDecision::RetryAfter(self.delay)
        } else {
            RetryDecision::NoRetry
        }
    }

    /// Upper bound on the time spent sleeping for a call that never succeeds.
    pub fn worst_case_wait(&self) -> Duration {
        self.delay
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }
}
