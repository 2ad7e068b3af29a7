//! The container
//!
//! Provides [`Injector`]: registrations, recursive resolution, per-key
//! intercept tables and the resolve-hook chain.
//!
//! # Resolution
//! 1. Reject cycles and chains deeper than the configured limit
//! 2. Run every hook (a hook may re-register the key)
//! 3. Return a cached singleton if one exists
//! 4. Produce the value from the registration, or construct the class key
//!    directly (dependencies first)
//! 5. Attach the key's intercept table to a produced object
//!
//! No lock or map guard is held while hooks, factories or constructors run.
//!
//! The active resolution path lives on the container, one stack per thread,
//! so a factory that calls back into [`Injector::resolve`] extends the path
//! of the request that invoked it.

use crate::config::InjectorConfig;
use crate::error::ResolutionError;
use crate::hook::{ResolveHook, ResolveRequest};
use crate::registration::{Lifetime, Provider, Registration};
use dashmap::DashMap;
use decoy_object::{ClassRef, Instance, InterceptTable, ProxyHandle, TypeKey, Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Dependency-injection container
pub struct Injector {
    config: InjectorConfig,
    registrations: DashMap<TypeKey, Registration>,
    singletons: DashMap<TypeKey, Value>,
    proxies: DashMap<TypeKey, InterceptTable>,
    hooks: RwLock<Vec<Arc<dyn ResolveHook>>>,
    active: DashMap<ThreadId, Vec<TypeKey>>,
}

impl Injector {
    /// Create container with default configuration and no hooks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    /// Create container with configuration
    #[must_use]
    pub fn with_config(config: InjectorConfig) -> Self {
        Self {
            config,
            registrations: DashMap::new(),
            singletons: DashMap::new(),
            proxies: DashMap::new(),
            hooks: RwLock::new(Vec::new()),
            active: DashMap::new(),
        }
    }

    /// Start a builder (configuration plus construction-time hooks)
    #[inline]
    #[must_use]
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::default()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Register (or replace) how `key` is produced
    ///
    /// Any cached singleton for `key` is dropped.
    pub fn register(&self, key: impl Into<TypeKey>, registration: Registration) {
        let key = key.into();
        tracing::debug!(%key, lifetime = ?registration.lifetime, "registration installed");
        self.singletons.remove(&key);
        self.registrations.insert(key, registration);
    }

    /// Register a transient factory for `key`
    pub fn register_factory<F>(&self, key: impl Into<TypeKey>, factory: F)
    where
        F: Fn(&Injector) -> Result<Value, ResolutionError> + Send + Sync + 'static,
    {
        self.register(key, Registration::factory(factory));
    }

    /// Register a fixed value for `key`
    pub fn register_value(&self, key: impl Into<TypeKey>, value: impl Into<Value>) {
        self.register(key, Registration::value(value));
    }

    /// Bind `key` to a class
    pub fn register_class(&self, key: impl Into<TypeKey>, class: ClassRef, lifetime: Lifetime) {
        self.register(key, Registration::class(class).with_lifetime(lifetime));
    }

    /// Resolve `class` once and reuse the instance afterwards
    pub fn register_singleton(&self, class: &ClassRef) {
        self.register_class(class, class.clone(), Lifetime::Singleton);
    }

    /// Check whether `key` has an explicit registration
    #[inline]
    #[must_use]
    pub fn is_registered(&self, key: &TypeKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// Append a resolve hook; hooks run in the order they were added
    pub fn add_hook(&self, hook: Arc<dyn ResolveHook>) {
        self.hooks.write().push(hook);
        tracing::debug!(count = self.hook_count(), "resolve hook added");
    }

    /// Number of installed hooks
    #[inline]
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    /// Proxy handle for `key`; rules apply to every object resolved for it,
    /// including objects resolved before the rule was added
    #[must_use]
    pub fn proxy(&self, key: &TypeKey) -> ProxyHandle {
        ProxyHandle::new(self.table_for(key))
    }

    fn table_for(&self, key: &TypeKey) -> InterceptTable {
        self.proxies
            .entry(key.clone())
            .or_insert_with(|| InterceptTable::new(key.name()))
            .clone()
    }

    /// Resolve `key`
    ///
    /// Calls made from inside a factory count as nested requests: cycles and
    /// the depth limit are checked across factory boundaries.
    ///
    /// # Errors
    /// See [`ResolutionError`]; faults raised by constructors are carried
    /// unchanged inside [`ResolutionError::Construction`].
    pub fn resolve(&self, key: &TypeKey) -> Result<Value, ResolutionError> {
        let path = self.active_path();
        if path.contains(key) {
            let mut cycle: Vec<String> = path.iter().map(ToString::to_string).collect();
            cycle.push(key.to_string());
            return Err(ResolutionError::Cycle { path: cycle });
        }
        if path.len() >= self.config.max_resolution_depth {
            return Err(ResolutionError::DepthExceeded {
                key: key.to_string(),
                limit: self.config.max_resolution_depth,
            });
        }

        self.run_hooks(key, path)?;

        if let Some(cached) = self.singletons.get(key).map(|v| v.value().clone()) {
            return Ok(cached);
        }

        let registration = self.registrations.get(key).map(|r| r.value().clone());
        let lifetime = registration
            .as_ref()
            .map_or(self.config.default_lifetime, |r| r.lifetime);

        let value = {
            let _frame = self.enter(key);
            self.produce(key, registration)?
        };

        if let Value::Object(instance) = &value {
            instance.attach_if_unset(self.table_for(key));
        }
        if lifetime == Lifetime::Singleton {
            self.singletons.insert(key.clone(), value.clone());
        }
        Ok(value)
    }

    /// Resolve `key` and require an object
    ///
    /// # Errors
    /// As [`resolve`](Self::resolve), plus [`ResolutionError::Factory`] when
    /// the produced value is not an object.
    pub fn resolve_instance(&self, key: &TypeKey) -> Result<Instance, ResolutionError> {
        match self.resolve(key)? {
            Value::Object(instance) => Ok(instance),
            other => Err(ResolutionError::factory(
                key,
                format!("expected object, produced {}", other.type_name()),
            )),
        }
    }

    fn active_path(&self) -> Vec<TypeKey> {
        self.active
            .get(&thread::current().id())
            .map(|stack| stack.value().clone())
            .unwrap_or_default()
    }

    fn enter(&self, key: &TypeKey) -> ActiveFrame<'_> {
        let thread = thread::current().id();
        self.active.entry(thread).or_default().push(key.clone());
        ActiveFrame {
            active: &self.active,
            thread,
        }
    }

    fn run_hooks(&self, key: &TypeKey, path: Vec<TypeKey>) -> Result<(), ResolutionError> {
        let hooks: Vec<Arc<dyn ResolveHook>> = self.hooks.read().clone();
        if hooks.is_empty() {
            return Ok(());
        }
        let request = ResolveRequest {
            key: key.clone(),
            path,
        };
        for hook in hooks {
            hook.before_resolve(self, &request)?;
        }
        Ok(())
    }

    fn produce(
        &self,
        key: &TypeKey,
        registration: Option<Registration>,
    ) -> Result<Value, ResolutionError> {
        match registration.map(|r| r.provider) {
            Some(Provider::Factory(factory)) => factory(self),
            Some(Provider::Value(value)) => Ok(value),
            Some(Provider::Class(class)) => self.construct(&class),
            None => match key {
                TypeKey::Class(class) => self.construct(class),
                TypeKey::Named(_) => Err(ResolutionError::unregistered(key)),
            },
        }
    }

    fn construct(&self, class: &ClassRef) -> Result<Value, ResolutionError> {
        let mut dependencies = Vec::with_capacity(class.dependencies().len());
        for dependency in class.dependencies() {
            dependencies.push(self.resolve(&dependency.key)?);
        }
        tracing::trace!(class = class.name(), "constructing");
        class
            .construct(&dependencies)
            .map(Value::Object)
            .map_err(|source| ResolutionError::Construction {
                key: class.name().to_string(),
                source,
            })
    }
}

/// One entry on the calling thread's active path, popped on drop
struct ActiveFrame<'a> {
    active: &'a DashMap<ThreadId, Vec<TypeKey>>,
    thread: ThreadId,
}

impl Drop for ActiveFrame<'_> {
    fn drop(&mut self) {
        let drained = match self.active.get_mut(&self.thread) {
            Some(mut stack) => {
                stack.pop();
                stack.is_empty()
            }
            None => false,
        };
        if drained {
            self.active.remove_if(&self.thread, |_, stack| stack.is_empty());
        }
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("config", &self.config)
            .field("registrations", &self.registrations.len())
            .field("singletons", &self.singletons.len())
            .field("proxies", &self.proxies.len())
            .field("hooks", &self.hook_count())
            .finish()
    }
}

/// Builder for [`Injector`]
#[derive(Default)]
pub struct InjectorBuilder {
    config: InjectorConfig,
    hooks: Vec<Arc<dyn ResolveHook>>,
}

impl InjectorBuilder {
    /// With configuration
    #[inline]
    #[must_use]
    pub fn config(mut self, config: InjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// With a resolve hook
    #[inline]
    #[must_use]
    pub fn hook(mut self, hook: Arc<dyn ResolveHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Build the container
    #[must_use]
    pub fn build(self) -> Injector {
        let injector = Injector::with_config(self.config);
        *injector.hooks.write() = self.hooks;
        injector
    }
}
