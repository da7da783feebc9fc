//! Runtime-typed values and operation descriptors for the generic retrier.

use std::any::Any;
use std::fmt;

/// A runtime-typed argument or return value.
pub type Value = Box<dyn Any + Send + Sync>;

/// Error carried in a failure slot.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Concrete type stored in a [`Slot::Failure`] position: `None` means the
/// invocation succeeded.
pub type FailureSlot = Option<BoxError>;

/// Wrap any value for passing to, or returning from, a [`DynFn`].
pub fn value<T: Any + Send + Sync>(v: T) -> Value {
    Box::new(v)
}

/// An empty failure slot (the invocation succeeded).
pub fn ok() -> Value {
    Box::new(None::<BoxError>)
}

/// A filled failure slot.
pub fn fail<E: Into<BoxError>>(err: E) -> Value {
    let slot: FailureSlot = Some(err.into());
    Box::new(slot)
}

/// Borrow argument `index` as `T`, or `None` if absent or of another type.
pub fn arg<T: Any>(args: &[Value], index: usize) -> Option<&T> {
    args.get(index)?.downcast_ref::<T>()
}

/// Declared kind of one return position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Ordinary data; never inspected.
    Value,
    /// Holds a [`FailureSlot`]. Only meaningful in the last position.
    Failure,
}

/// Declared shape of a [`DynFn`]: parameter count, variadic-ness and return
/// slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Number of parameters; for variadic signatures, the fixed leading ones.
    pub params: usize,
    pub variadic: bool,
    pub results: Vec<Slot>,
}

impl Signature {
    /// Exactly `params` arguments, no results until [`Signature::returning`].
    pub fn fixed(params: usize) -> Self {
        Self {
            params,
            variadic: false,
            results: Vec::new(),
        }
    }

    /// `fixed_params` leading arguments followed by any number of extras.
    pub fn variadic(fixed_params: usize) -> Self {
        Self {
            params: fixed_params,
            variadic: true,
            results: Vec::new(),
        }
    }

    pub fn returning(mut self, slots: &[Slot]) -> Self {
        self.results = slots.to_vec();
        self
    }

    /// Whether a call with `count` arguments fits this signature.
    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.params
        } else {
            count == self.params
        }
    }

    pub fn trailing_slot(&self) -> Option<Slot> {
        self.results.last().copied()
    }
}

type Body = Box<dyn FnMut(&[Value]) -> Vec<Value> + Send + Sync>;

/// An invocable operation whose shape is only known at runtime.
///
/// The generic retrier recognises a `DynFn` behind `&mut dyn Any`; anything
/// else is rejected as not invocable.
///
/// The body must be `Send + Sync` so a `DynFn` can itself travel as a
/// [`Value`].
pub struct DynFn {
    signature: Signature,
    body: Body,
}

impl DynFn {
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Box::new(body),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&mut self, args: &[Value]) -> Vec<Value> {
        (self.body)(args)
    }
}

impl fmt::Debug for DynFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynFn")
            .field("signature", &self.signature)
            .field("body", &"<fn>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_signature_needs_exact_count() {
        let sig = Signature::fixed(2).returning(&[Slot::Value, Slot::Failure]);
        assert!(sig.accepts(2));
        assert!(!sig.accepts(1));
        assert!(!sig.accepts(3));
        assert_eq!(sig.trailing_slot(), Some(Slot::Failure));
    }

    #[test]
    fn variadic_signature_accepts_extras() {
        let sig = Signature::variadic(1);
        assert!(sig.accepts(1));
        assert!(sig.accepts(7));
        assert!(!sig.accepts(0));
        assert_eq!(sig.trailing_slot(), None);
    }

    #[test]
    fn failure_slot_helpers() {
        let empty = ok();
        assert!(matches!(empty.downcast_ref::<FailureSlot>(), Some(None)));

        let filled = fail("boom");
        let slot = filled.downcast_ref::<FailureSlot>().unwrap();
        assert_eq!(slot.as_ref().unwrap().to_string(), "boom");
    }

    #[test]
    fn arg_downcasts_by_position() {
        let args = vec![value(3i64), value("x".to_string())];
        assert_eq!(arg::<i64>(&args, 0), Some(&3));
        assert_eq!(arg::<String>(&args, 1).map(String::as_str), Some("x"));
        assert!(arg::<i64>(&args, 1).is_none());
        assert!(arg::<i64>(&args, 2).is_none());
    }
}
