//! Generic retrier for operations whose shape is only known at runtime.
//!
//! An operation is a [`DynFn`]: a boxed closure over `&[Value]` plus a
//! [`Signature`] describing its parameters and return slots. The call shape is
//! validated once up front; misuse is reported as a contract error and never
//! retried. If the last declared slot is [`Slot::Failure`], a filled slot is a
//! failed attempt. Without a failure slot the operation runs exactly once and
//! the outcome is [`Determination::Indeterminate`].
//!
//! Successful outcomes drop the trailing failure slot from `values`.

mod error;
mod run;
mod value;

pub use error::DynRetryError;
pub use run::{retry_dynamic, Determination, DynOutcome};
pub use value::{arg, fail, ok, value, BoxError, DynFn, FailureSlot, Signature, Slot, Value};
