//! Error type for the generic retrier.

use thiserror::Error;

use super::value::{BoxError, Value};

/// Failure of a generic retry call.
///
/// Every variant except [`DynRetryError::Exhausted`] means the retrier was
/// used wrongly; those are reported without retrying.
#[derive(Debug, Error)]
pub enum DynRetryError {
    /// The operation is not a [`DynFn`](super::DynFn).
    #[error("retry: fn is not a function")]
    InvalidOperation,
    /// Argument count does not fit the declared parameter list.
    #[error(
        "retry: fn argument mismatch: expected {}{expected} argument(s), got {got}",
        at_least(.variadic)
    )]
    ArgumentMismatch {
        expected: usize,
        variadic: bool,
        got: usize,
    },
    /// The signature declares no return slots at all.
    #[error("retry: can not determine success/failure with no return value")]
    NoFailureSignal,
    /// The operation returned a different number of values than it declared.
    #[error("retry: fn returned {got} value(s) but declares {expected}")]
    ResultArityMismatch { expected: usize, got: usize },
    /// A declared failure slot held something other than a failure signal.
    #[error("retry: fn return's right most value must be an error")]
    FailureSlotMismatch,
    /// Every attempt failed. `values` holds the last attempt's results ahead
    /// of its failure slot; the failure itself is `source`.
    #[error("retry: operation failed after {attempts} attempt(s)")]
    Exhausted {
        attempts: u32,
        values: Vec<Value>,
        #[source]
        source: BoxError,
    },
}

impl DynRetryError {
    /// True for misuse of the retrier, false for a failing operation.
    pub fn is_contract_error(&self) -> bool {
        !matches!(self, DynRetryError::Exhausted { .. })
    }
}

fn at_least(variadic: &bool) -> &'static str {
    if *variadic {
        "at least "
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn argument_mismatch_mentions_variadic_floor() {
        let fixed = DynRetryError::ArgumentMismatch {
            expected: 2,
            variadic: false,
            got: 3,
        };
        assert_eq!(
            fixed.to_string(),
            "retry: fn argument mismatch: expected 2 argument(s), got 3"
        );
        let variadic = DynRetryError::ArgumentMismatch {
            expected: 1,
            variadic: true,
            got: 0,
        };
        assert!(variadic.to_string().contains("at least 1"));
    }

    #[test]
    fn exhausted_exposes_operation_failure_as_source() {
        let err = DynRetryError::Exhausted {
            attempts: 2,
            values: Vec::new(),
            source: "can not divide by zero".into(),
        };
        assert!(!err.is_contract_error());
        assert_eq!(err.to_string(), "retry: operation failed after 2 attempt(s)");
        assert!(!err.to_string().contains("divide"));
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("can not divide by zero")
        );
    }

    #[test]
    fn error_is_send_sync_and_converts_to_anyhow() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DynRetryError>();

        let err = DynRetryError::Exhausted {
            attempts: 1,
            values: vec![crate::retry::dynamic::value(0.0f64)],
            source: "boom".into(),
        };
        let wrapped: anyhow::Error = err.into();
        let chain: Vec<String> = wrapped.chain().map(|e| e.to_string()).collect();
        assert_eq!(
            chain,
            vec!["retry: operation failed after 1 attempt(s)", "boom"]
        );
        assert_eq!(
            format!("{:#}", wrapped),
            "retry: operation failed after 1 attempt(s): boom"
        );
    }

    #[test]
    fn contract_errors_are_flagged() {
        assert!(DynRetryError::InvalidOperation.is_contract_error());
        assert!(DynRetryError::NoFailureSignal.is_contract_error());
        assert!(DynRetryError::FailureSlotMismatch.is_contract_error());
    }
}
