//! Dynamic values
//!
//! Provides [`Value`], the currency of every property read, write and method
//! call on an [`Instance`](crate::Instance).

use crate::error::ObjectError;
use crate::instance::Instance;
use std::fmt::{self, Display, Formatter};

/// A dynamically typed value
///
/// `Undefined` and `Null` are distinct on purpose: `Undefined` means "never
/// assigned", `Null` means "explicitly empty". Stubbed members answer `Null`,
/// untouched auto-properties answer `Undefined`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Never assigned
    #[default]
    Undefined,

    /// Explicitly empty
    Null,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// UTF-8 string
    Str(String),

    /// Ordered list of values
    List(Vec<Value>),

    /// Reference to an object (compared by identity)
    Object(Instance),
}

impl Value {
    /// Check for `Undefined`
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check for `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for either `Null` or `Undefined`
    #[inline]
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Truthiness in the loose sense used by dynamic object code
    ///
    /// `Undefined`, `Null`, `false`, `0`, `0.0`, NaN and `""` are falsy,
    /// everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::List(_) | Self::Object(_) => true,
        }
    }

    /// Boolean payload, if this is a `Bool`
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Int`
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if this is a `Str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Object reference, if this is an `Object`
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Object reference or a `NotAnObject` error naming `context`
    ///
    /// # Errors
    /// Returns [`ObjectError::NotAnObject`] for any non-object value.
    pub fn expect_object(&self, context: &str) -> Result<&Instance, ObjectError> {
        self.as_object().ok_or_else(|| ObjectError::NotAnObject {
            context: context.to_string(),
            found: self.type_name(),
        })
    }

    /// Short name of the variant, for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(o) => write!(f, "[object {}]", o.class_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Instance> for Value {
    fn from(o: Instance) -> Self {
        Self::Object(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
