//! Spies
//!
//! Provides [`Spy`], a shared call recorder with a configurable answer.

use decoy_object::{ObjectError, Value};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Computed answer: receives the call's arguments
pub type FakeFn = Arc<dyn Fn(&[Value]) -> Result<Value, ObjectError> + Send + Sync>;

/// How a spy answers a call
#[derive(Clone, Default)]
pub enum SpyBehavior {
    /// Answer `Undefined`
    #[default]
    Unconfigured,
    /// Answer a fixed value
    Returns(Value),
    /// Answer values in order, then `Undefined`
    Sequence(VecDeque<Value>),
    /// Run the real member
    CallThrough,
    /// Compute the answer from the arguments
    Fake(FakeFn),
    /// Raise a fault
    Throws(String),
}

impl fmt::Debug for SpyBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "Unconfigured"),
            Self::Returns(v) => f.debug_tuple("Returns").field(v).finish(),
            Self::Sequence(vs) => f.debug_tuple("Sequence").field(vs).finish(),
            Self::CallThrough => write!(f, "CallThrough"),
            Self::Fake(_) => write!(f, "Fake(..)"),
            Self::Throws(m) => f.debug_tuple("Throws").field(m).finish(),
        }
    }
}

/// One recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Arguments, in order
    pub args: Vec<Value>,
}

struct SpyInner {
    name: String,
    calls: Mutex<Vec<Call>>,
    behavior: RwLock<SpyBehavior>,
}

/// Shared call recorder
///
/// Cloning shares the recorder: configuration through any clone affects
/// every holder, and every holder sees every call.
///
/// ```
/// use decoy_spy::Spy;
/// use decoy_object::Value;
///
/// let spy = Spy::new("login").returns(true);
/// let answer = spy.invoke(&[Value::from("u"), Value::from("p")], |_| Ok(Value::Null));
/// assert_eq!(answer.unwrap(), Value::Bool(true));
/// assert_eq!(spy.call_count(), 1);
/// ```
#[derive(Clone)]
pub struct Spy(Arc<SpyInner>);

impl Spy {
    /// Create an unconfigured spy
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(SpyInner {
            name: name.into(),
            calls: Mutex::new(Vec::new()),
            behavior: RwLock::new(SpyBehavior::Unconfigured),
        }))
    }

    /// Diagnostic name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Replace the behavior
    pub fn set_behavior(&self, behavior: SpyBehavior) {
        tracing::trace!(spy = %self.0.name, ?behavior, "spy configured");
        *self.0.behavior.write() = behavior;
    }

    /// Current behavior
    #[must_use]
    pub fn behavior(&self) -> SpyBehavior {
        self.0.behavior.read().clone()
    }

    /// Answer every call with `value`
    pub fn returns(&self, value: impl Into<Value>) -> Self {
        self.set_behavior(SpyBehavior::Returns(value.into()));
        self.clone()
    }

    /// Answer successive calls with `values`, then `Undefined`
    pub fn returns_in_order(&self, values: impl IntoIterator<Item = Value>) -> Self {
        self.set_behavior(SpyBehavior::Sequence(values.into_iter().collect()));
        self.clone()
    }

    /// Run the real member
    pub fn calls_through(&self) -> Self {
        self.set_behavior(SpyBehavior::CallThrough);
        self.clone()
    }

    /// Compute the answer with `f`
    pub fn calls_fake<F>(&self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.set_behavior(SpyBehavior::Fake(Arc::new(f)));
        self.clone()
    }

    /// Raise `ObjectError::Thrown(message)` on every call
    pub fn throws(&self, message: impl Into<String>) -> Self {
        self.set_behavior(SpyBehavior::Throws(message.into()));
        self.clone()
    }

    /// Forget recorded calls and behavior
    pub fn reset(&self) {
        self.0.calls.lock().clear();
        self.set_behavior(SpyBehavior::Unconfigured);
    }

    /// Record a call and answer it
    ///
    /// `real` runs only when the spy calls through.
    ///
    /// # Errors
    /// Faults from `real`, from a fake, or the configured `Throws` fault.
    pub fn invoke<R>(&self, args: &[Value], real: R) -> Result<Value, ObjectError>
    where
        R: FnOnce(&[Value]) -> Result<Value, ObjectError>,
    {
        self.0.calls.lock().push(Call {
            args: args.to_vec(),
        });
        let behavior = {
            let mut slot = self.0.behavior.write();
            match &mut *slot {
                SpyBehavior::Sequence(values) => {
                    return Ok(values.pop_front().unwrap_or_default());
                }
                other => other.clone(),
            }
        };
        match behavior {
            SpyBehavior::Unconfigured | SpyBehavior::Sequence(_) => Ok(Value::Undefined),
            SpyBehavior::Returns(value) => Ok(value),
            SpyBehavior::CallThrough => real(args),
            SpyBehavior::Fake(f) => f(args),
            SpyBehavior::Throws(message) => Err(ObjectError::Thrown(message)),
        }
    }

    /// Record a call with no real member behind it
    ///
    /// # Errors
    /// As [`invoke`](Self::invoke); calling through answers `Undefined`.
    pub fn call(&self, args: &[Value]) -> Result<Value, ObjectError> {
        self.invoke(args, |_| Ok(Value::Undefined))
    }

    /// Recorded calls, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.0.calls.lock().clone()
    }

    /// Number of recorded calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.0.calls.lock().len()
    }

    /// Check whether the spy was called at least once
    #[inline]
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Most recent call
    #[must_use]
    pub fn last_call(&self) -> Option<Call> {
        self.0.calls.lock().last().cloned()
    }

    /// Check whether any call had exactly `args`
    #[must_use]
    pub fn was_called_with(&self, args: &[Value]) -> bool {
        self.0.calls.lock().iter().any(|c| c.args == args)
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.0.name)
            .field("calls", &self.call_count())
            .field("behavior", &*self.0.behavior.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unconfigured_answers_undefined() {
        let spy = Spy::new("m");
        assert_eq!(spy.call(&[]).unwrap(), Value::Undefined);
        assert!(spy.was_called());
    }

    #[test]
    fn clones_share_configuration_and_calls() {
        let first = Spy::new("m");
        let second = first.clone();
        second.returns(5);

        assert_eq!(first.call(&[Value::Int(1)]).unwrap(), Value::Int(5));
        assert_eq!(second.call_count(), 1);
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn records_arguments() {
        let spy = Spy::new("login");
        spy.call(&[Value::from("test"), Value::from("method")]).unwrap();
        assert!(spy.was_called_with(&[Value::from("test"), Value::from("method")]));
        assert!(!spy.was_called_with(&[Value::from("test")]));
        assert_eq!(spy.last_call().unwrap().args.len(), 2);
    }

    #[test]
    fn call_through_runs_real() {
        let spy = Spy::new("m").calls_through();
        let answer = spy.invoke(&[Value::Int(2)], |args| {
            Ok(Value::Int(args[0].as_int().unwrap_or(0) * 10))
        });
        assert_eq!(answer.unwrap(), Value::Int(20));
    }

    #[test]
    fn real_not_run_unless_calling_through() {
        let spy = Spy::new("m").returns(1);
        let answer = spy.invoke(&[], |_| Err(ObjectError::thrown("real ran")));
        assert_eq!(answer.unwrap(), Value::Int(1));
    }

    #[test]
    fn fake_and_throw() {
        let spy = Spy::new("m").calls_fake(|args| Ok(Value::Int(args.len() as i64)));
        assert_eq!(spy.call(&[Value::Null, Value::Null]).unwrap(), Value::Int(2));

        spy.throws("nope");
        assert_eq!(spy.call(&[]).unwrap_err(), ObjectError::thrown("nope"));
    }

    #[test]
    fn sequence_then_undefined() {
        let spy = Spy::new("m").returns_in_order([Value::Int(1), Value::Int(2)]);
        assert_eq!(spy.call(&[]).unwrap(), Value::Int(1));
        assert_eq!(spy.call(&[]).unwrap(), Value::Int(2));
        assert_eq!(spy.call(&[]).unwrap(), Value::Undefined);
    }

    #[test]
    fn reset_clears_everything() {
        let spy = Spy::new("m").returns(1);
        assert!(matches!(spy.behavior(), SpyBehavior::Returns(Value::Int(1))));
        spy.call(&[]).unwrap();
        spy.reset();
        assert!(matches!(spy.behavior(), SpyBehavior::Unconfigured));
        assert_eq!(spy.call_count(), 0);
        assert_eq!(spy.call(&[]).unwrap(), Value::Undefined);
    }
}
