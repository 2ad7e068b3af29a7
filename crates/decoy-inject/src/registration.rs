//! Registrations
//!
//! How a key is produced ([`Provider`]) and how long the result lives
//! ([`Lifetime`]).

use crate::error::ResolutionError;
use crate::injector::Injector;
use decoy_object::{ClassRef, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Factory producing a value for a key
pub type FactoryFn = Arc<dyn Fn(&Injector) -> Result<Value, ResolutionError> + Send + Sync>;

/// How long a resolved value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// New value on every resolution
    #[default]
    Transient,
    /// First resolved value is reused
    Singleton,
}

/// Source of a key's value
#[derive(Clone)]
pub enum Provider {
    /// Call a factory
    Factory(FactoryFn),
    /// Hand out a fixed value
    Value(Value),
    /// Construct a class, resolving its dependencies
    Class(ClassRef),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(_) => write!(f, "Factory(..)"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Class(c) => f.debug_tuple("Class").field(c).finish(),
        }
    }
}

/// A provider with its lifetime
#[derive(Debug, Clone)]
pub struct Registration {
    /// Source of the value
    pub provider: Provider,
    /// Caching policy
    pub lifetime: Lifetime,
}

impl Registration {
    /// Transient factory registration
    #[must_use]
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Injector) -> Result<Value, ResolutionError> + Send + Sync + 'static,
    {
        Self {
            provider: Provider::Factory(Arc::new(f)),
            lifetime: Lifetime::Transient,
        }
    }

    /// Fixed value registration (always behaves as a singleton)
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            provider: Provider::Value(value.into()),
            lifetime: Lifetime::Singleton,
        }
    }

    /// Class binding registration
    #[must_use]
    pub fn class(class: ClassRef) -> Self {
        Self {
            provider: Provider::Class(class),
            lifetime: Lifetime::Transient,
        }
    }

    /// With lifetime
    #[inline]
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }
}
