//! Cascading isolation
//!
//! Once armed, every class key requested during resolution that is not on
//! the allow list is turned into a pure proxy before the container looks at
//! its registrations. Because the container asks the hook again for every
//! dependency, the redirection cascades through the whole graph, but stops at
//! a proxy: a pure proxy has no dependencies to resolve.
//!
//! Named keys are never redirected.

use crate::auto_prop::AutoPropertyStore;
use crate::pure_proxy;
use dashmap::DashSet;
use decoy_inject::{Injector, ResolutionError, ResolveHook, ResolveRequest};
use decoy_object::{ClassRef, TypeKey};
use indexmap::IndexSet;
use parking_lot::RwLock;
use std::sync::Arc;

/// Allow-list hook installed on the engine's container when first armed
#[derive(Debug)]
pub struct IsolationPolicy {
    allowed: RwLock<IndexSet<TypeKey>>,
    proxied: DashSet<TypeKey>,
    props: Arc<AutoPropertyStore>,
    auto_prop: bool,
}

impl IsolationPolicy {
    /// Create a policy with an empty allow list
    #[must_use]
    pub fn new(props: Arc<AutoPropertyStore>, auto_prop: bool) -> Self {
        Self {
            allowed: RwLock::new(IndexSet::new()),
            proxied: DashSet::new(),
            props,
            auto_prop,
        }
    }

    /// Add keys to the allow list; returns how many were new
    pub fn allow(&self, keys: Keys) -> usize {
        let mut allowed = self.allowed.write();
        let before = allowed.len();
        allowed.extend(keys.into_vec());
        allowed.len() - before
    }

    /// Check whether `key` resolves normally
    #[must_use]
    pub fn is_allowed(&self, key: &TypeKey) -> bool {
        !key.is_constructible() || self.allowed.read().contains(key)
    }

    /// Allow list, in insertion order
    #[must_use]
    pub fn allowed(&self) -> Vec<TypeKey> {
        self.allowed.read().iter().cloned().collect()
    }

    /// Keys redirected so far
    #[must_use]
    pub fn proxied_count(&self) -> usize {
        self.proxied.len()
    }
}

impl ResolveHook for IsolationPolicy {
    fn before_resolve(
        &self,
        injector: &Injector,
        request: &ResolveRequest,
    ) -> Result<(), ResolutionError> {
        if self.is_allowed(&request.key) || !self.proxied.insert(request.key.clone()) {
            return Ok(());
        }
        tracing::debug!(key = %request.key, depth = request.depth(), "isolating");
        pure_proxy::install(injector, &request.key, &self.props, self.auto_prop)
            .map_err(|e| ResolutionError::hook(&request.key, e.to_string()))
    }
}

/// One key or several, for [`AutoMocker::isolate`](crate::AutoMocker::isolate)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys(Vec<TypeKey>);

impl Keys {
    /// Keys in order
    #[must_use]
    pub fn into_vec(self) -> Vec<TypeKey> {
        self.0
    }
}

impl From<TypeKey> for Keys {
    fn from(key: TypeKey) -> Self {
        Self(vec![key])
    }
}

impl From<&TypeKey> for Keys {
    fn from(key: &TypeKey) -> Self {
        Self(vec![key.clone()])
    }
}

impl From<ClassRef> for Keys {
    fn from(class: ClassRef) -> Self {
        Self(vec![TypeKey::from(class)])
    }
}

impl From<&ClassRef> for Keys {
    fn from(class: &ClassRef) -> Self {
        Self(vec![TypeKey::from(class)])
    }
}

impl From<&str> for Keys {
    fn from(name: &str) -> Self {
        Self(vec![TypeKey::named(name)])
    }
}

impl<T: Into<TypeKey>> From<Vec<T>> for Keys {
    fn from(keys: Vec<T>) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TypeKey>, const N: usize> From<[T; N]> for Keys {
    fn from(keys: [T; N]) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }
}
