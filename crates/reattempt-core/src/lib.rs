pub mod config;
pub mod logging;
pub mod retry;

pub use retry::dynamic::{retry_dynamic, DynFn, DynOutcome, DynRetryError, Signature, Slot};
pub use retry::{retry, retry_async, retry_with, RetryPolicy};
