//! Expectations over recorded calls

use crate::error::VerificationError;
use crate::spy::Spy;
use decoy_object::Value;
use std::fmt;

/// Matches a single argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgMatcher {
    /// Anything
    Any,
    /// Equal to the value
    Eq(Value),
    /// `Null`
    Null,
    /// `Undefined`
    Undefined,
    /// Truthy
    Truthy,
}

impl ArgMatcher {
    /// Equality matcher
    #[inline]
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::Eq(value.into())
    }

    /// Check one argument
    #[must_use]
    pub fn matches(&self, arg: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Eq(expected) => expected == arg,
            Self::Null => arg.is_null(),
            Self::Undefined => arg.is_undefined(),
            Self::Truthy => arg.is_truthy(),
        }
    }
}

impl fmt::Display for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "<any>"),
            Self::Eq(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Undefined => write!(f, "undefined"),
            Self::Truthy => write!(f, "<truthy>"),
        }
    }
}

/// An assertion about a spy's recorded calls
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// At least one call
    Called,
    /// No calls
    NotCalled,
    /// Exactly `n` calls
    CalledTimes(usize),
    /// Some call matched every argument matcher (and the arity)
    CalledWith(Vec<ArgMatcher>),
    /// The most recent call matched
    LastCalledWith(Vec<ArgMatcher>),
}

impl Expectation {
    /// Some call had exactly these arguments
    #[must_use]
    pub fn called_with(args: impl IntoIterator<Item = Value>) -> Self {
        Self::CalledWith(args.into_iter().map(ArgMatcher::Eq).collect())
    }

    /// The most recent call had exactly these arguments
    #[must_use]
    pub fn last_called_with(args: impl IntoIterator<Item = Value>) -> Self {
        Self::LastCalledWith(args.into_iter().map(ArgMatcher::Eq).collect())
    }

    /// Evaluate against `spy`
    ///
    /// # Errors
    /// [`VerificationError`] describing the mismatch.
    pub fn check(&self, spy: &Spy) -> Result<(), VerificationError> {
        let calls = spy.calls();
        let ok = match self {
            Self::Called => !calls.is_empty(),
            Self::NotCalled => calls.is_empty(),
            Self::CalledTimes(n) => calls.len() == *n,
            Self::CalledWith(matchers) => calls.iter().any(|c| matches_all(matchers, &c.args)),
            Self::LastCalledWith(matchers) => calls
                .last()
                .is_some_and(|c| matches_all(matchers, &c.args)),
        };
        if ok {
            return Ok(());
        }
        let actual = match calls.len() {
            0 => "it was never called".to_string(),
            n => {
                let rendered: Vec<String> = calls.iter().map(|c| render(&c.args)).collect();
                format!("it was called {n} time(s): {}", rendered.join(", "))
            }
        };
        Err(VerificationError::Mismatch {
            spy: spy.name().to_string(),
            expected: self.to_string(),
            actual,
        })
    }
}

fn matches_all(matchers: &[ArgMatcher], args: &[Value]) -> bool {
    matchers.len() == args.len() && matchers.iter().zip(args).all(|(m, a)| m.matches(a))
}

fn render(args: &[Value]) -> String {
    let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |ms: &[ArgMatcher]| {
            ms.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Called => write!(f, "to have been called"),
            Self::NotCalled => write!(f, "not to have been called"),
            Self::CalledTimes(n) => write!(f, "to have been called {n} time(s)"),
            Self::CalledWith(ms) => write!(f, "to have been called with ({})", list(ms)),
            Self::LastCalledWith(ms) => write!(f, "to have last been called with ({})", list(ms)),
        }
    }
}
