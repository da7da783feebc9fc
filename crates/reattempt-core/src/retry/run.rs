//! Retry loop: run a closure until success or the budget says stop.

use std::future::Future;
use std::time::Duration;

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `op` until it returns `Ok(())` or `max_attempts` is used up,
/// sleeping `delay` between failed attempts. Returns the last error on
/// exhaustion.
pub fn retry<E, F>(max_attempts: u32, delay: Duration, op: F) -> Result<(), E>
where
    F: FnMut() -> Result<(), E>,
{
    RetryPolicy::new(max_attempts, delay).run(op)
}

/// Like [`retry`], but hands back whatever the successful attempt produced.
pub fn retry_with<T, E, F>(max_attempts: u32, delay: Duration, op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    RetryPolicy::new(max_attempts, delay).run_with(op)
}

/// Async variant of [`retry_with`]. The pause between attempts is a
/// `tokio::time::sleep`, so only the calling task is delayed.
pub async fn retry_async<T, E, F, Fut>(max_attempts: u32, delay: Duration, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryPolicy::new(max_attempts, delay).run_async(op).await
}

impl RetryPolicy {
    /// Fixed-signature retrier: `op` reports failure through its `Err`.
    pub fn run<E, F>(&self, op: F) -> Result<(), E>
    where
        F: FnMut() -> Result<(), E>,
    {
        self.run_with(op)
    }

    /// Blocks the calling thread for `delay` between failed attempts.
    pub fn run_with<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut remaining = self.max_attempts;
        let mut attempt = 1u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    remaining = remaining.saturating_sub(1);
                    match self.after_failure(attempt, remaining) {
                        RetryDecision::NoRetry => return Err(e),
                        RetryDecision::RetryAfter(d) => {
                            std::thread::sleep(d);
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }

    pub async fn run_async<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut remaining = self.max_attempts;
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    remaining = remaining.saturating_sub(1);
                    match self.after_failure(attempt, remaining) {
                        RetryDecision::NoRetry => return Err(e),
                        RetryDecision::RetryAfter(d) => {
                            tokio::time::sleep(d).await;
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }

    /// `decide` plus the per-attempt log line shared by every loop.
    pub(crate) fn after_failure(&self, attempt: u32, remaining: u32) -> RetryDecision {
        let decision = self.decide(remaining);
        match decision {
            RetryDecision::NoRetry => {
                tracing::warn!(attempt, "retry budget exhausted, giving up");
            }
            RetryDecision::RetryAfter(d) => {
                tracing::debug!(
                    attempt,
                    remaining,
                    delay_ms = d.as_millis() as u64,
                    "attempt failed, retrying"
                );
            }
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_reaches_five() {
        let mut tries = 0;
        let res = retry(5, Duration::ZERO, || {
            if tries < 5 {
                tries += 1;
                Err("tries is not five")
            } else {
                Ok(())
            }
        });
        // Five failures consume the whole budget of five.
        assert_eq!(tries, 5);
        assert_eq!(res, Err("tries is not five"));
    }

    #[test]
    fn success_stops_immediately() {
        let mut left = 5;
        let res: Result<(), &str> = retry(1, Duration::ZERO, || {
            left -= 1;
            Ok(())
        });
        assert!(res.is_ok());
        assert_eq!(left, 4);
    }

    #[test]
    fn retry_with_returns_success_value() {
        let mut calls = 0u32;
        let res: Result<u32, &str> = retry_with(4, Duration::ZERO, || {
            calls += 1;
            if calls == 3 {
                Ok(calls * 10)
            } else {
                Err("not yet")
            }
        });
        assert_eq!(res, Ok(30));
        assert_eq!(calls, 3);
    }

    #[test]
    fn policy_run_uses_its_own_budget() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let mut calls = 0;
        let res = policy.run(|| {
            calls += 1;
            Err::<(), _>(calls)
        });
        assert_eq!(res, Err(2));
        assert_eq!(calls, 2);
    }
}
