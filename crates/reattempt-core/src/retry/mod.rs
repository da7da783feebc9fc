//! Fixed-delay retry loops.
//!
//! Every loop invokes the operation, and on failure decrements the attempt
//! budget; while budget remains it pauses for the same fixed delay and tries
//! again, otherwise it surfaces the last failure. A budget of `0` still makes
//! one call.

pub mod dynamic;
mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{retry, retry_async, retry_with};
