//! Validation and invocation loop for runtime-described operations.

use std::any::Any;
use std::time::Duration;

use super::error::DynRetryError;
use super::value::{DynFn, FailureSlot, Signature, Slot, Value};
use crate::retry::policy::{RetryDecision, RetryPolicy};

/// Whether the retrier could tell success from failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determination {
    /// The failure slot was empty.
    Succeeded,
    /// No failure slot was declared; the operation ran exactly once and its
    /// outcome is unknown.
    Indeterminate,
}

/// Result of a generic retry call that did not end in an error.
#[derive(Debug)]
pub struct DynOutcome {
    /// Returned values. On success the trailing failure slot is stripped;
    /// when indeterminate every returned value is kept.
    pub values: Vec<Value>,
    pub determination: Determination,
    /// Invocations performed, including the successful one.
    pub attempts: u32,
}

impl DynOutcome {
    /// Borrow returned value `index` as `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    pub fn is_indeterminate(&self) -> bool {
        self.determination == Determination::Indeterminate
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Retries `op` with `args` until its failure slot comes back empty or the
/// budget is used up.
///
/// `op` must be a [`DynFn`]; its signature is checked against `args` once,
/// before the first call.
pub fn retry_dynamic(
    max_attempts: u32,
    delay: Duration,
    op: &mut dyn Any,
    args: &[Value],
) -> Result<DynOutcome, DynRetryError> {
    RetryPolicy::new(max_attempts, delay).run_dynamic(op, args)
}

impl RetryPolicy {
    pub fn run_dynamic(
        &self,
        op: &mut dyn Any,
        args: &[Value],
    ) -> Result<DynOutcome, DynRetryError> {
        let func = op
            .downcast_mut::<DynFn>()
            .ok_or(DynRetryError::InvalidOperation)?;
        validate(func.signature(), args.len())?;

        let declared = func.signature().results.len();
        let trailing = func.signature().trailing_slot();
        let mut remaining = self.max_attempts;
        let mut attempt = 1u32;
        loop {
            let mut out = func.call(args);
            if out.len() != declared {
                return Err(DynRetryError::ResultArityMismatch {
                    expected: declared,
                    got: out.len(),
                });
            }

            if trailing != Some(Slot::Failure) {
                tracing::debug!(
                    results = out.len(),
                    "no failure slot declared, ran once without a determination"
                );
                return Ok(DynOutcome {
                    values: out,
                    determination: Determination::Indeterminate,
                    attempts: attempt,
                });
            }

            let failure = match out.pop() {
                Some(last) => take_failure(last)?,
                None => return Err(DynRetryError::NoFailureSignal),
            };

            match failure {
                None => {
                    return Ok(DynOutcome {
                        values: out,
                        determination: Determination::Succeeded,
                        attempts: attempt,
                    })
                }
                Some(source) => {
                    remaining = remaining.saturating_sub(1);
                    match self.after_failure(attempt, remaining) {
                        RetryDecision::NoRetry => {
                            return Err(DynRetryError::Exhausted {
                                attempts: attempt,
                                values: out,
                                source,
                            })
                        }
                        RetryDecision::RetryAfter(d) => {
                            std::thread::sleep(d);
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }
}

/// Checks the call shape before anything is invoked.
fn validate(signature: &Signature, got: usize) -> Result<(), DynRetryError> {
    if !signature.accepts(got) {
        return Err(DynRetryError::ArgumentMismatch {
            expected: signature.params,
            variadic: signature.variadic,
            got,
        });
    }
    if signature.results.is_empty() {
        return Err(DynRetryError::NoFailureSignal);
    }
    tracing::trace!(
        params = signature.params,
        variadic = signature.variadic,
        results = signature.results.len(),
        args = got,
        "dynamic operation validated"
    );
    Ok(())
}

fn take_failure(last: Value) -> Result<FailureSlot, DynRetryError> {
    last.downcast::<FailureSlot>()
        .map(|slot| *slot)
        .map_err(|_| DynRetryError::FailureSlotMismatch)
}
