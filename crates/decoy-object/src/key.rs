//! Resolution keys
//!
//! Provides [`TypeKey`], the identity that joins registrations, proxies,
//! spies and allow-lists.

use crate::class::ClassRef;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Identifies a resolvable unit
///
/// - `Class`: a class reference, compared by pointer identity
/// - `Named`: a string registration, compared by string identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Class reference
    Class(ClassRef),
    /// String-keyed registration
    Named(Arc<str>),
}

impl TypeKey {
    /// Create a string key
    #[inline]
    #[must_use]
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(name.as_ref()))
    }

    /// Class behind this key, if it is a class key
    #[inline]
    #[must_use]
    pub fn class(&self) -> Option<&ClassRef> {
        match self {
            Self::Class(c) => Some(c),
            Self::Named(_) => None,
        }
    }

    /// Check whether this key has a class shape to construct or borrow
    #[inline]
    #[must_use]
    pub fn is_constructible(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    /// Human-readable name (class name or registration string)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(c) => c.name(),
            Self::Named(n) => n,
        }
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{}", c.name()),
            Self::Named(n) => write!(f, "\"{n}\""),
        }
    }
}

impl From<ClassRef> for TypeKey {
    fn from(c: ClassRef) -> Self {
        Self::Class(c)
    }
}

impl From<&ClassRef> for TypeKey {
    fn from(c: &ClassRef) -> Self {
        Self::Class(c.clone())
    }
}

impl From<&TypeKey> for TypeKey {
    fn from(k: &TypeKey) -> Self {
        k.clone()
    }
}

impl From<&str> for TypeKey {
    fn from(s: &str) -> Self {
        Self::named(s)
    }
}

impl From<String> for TypeKey {
    fn from(s: String) -> Self {
        Self::named(s)
    }
}
