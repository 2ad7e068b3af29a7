//! The auto-mocking engine
//!
//! [`AutoMocker`] owns a container plus everything the mocking layer keeps
//! per engine: the spy registry, the auto-property store, the isolation
//! policy and the deferred verifications. Nothing is shared between engines.

use crate::auto_prop::AutoPropertyStore;
use crate::config::MockerConfig;
use crate::error::{ConfigurationError, MockError};
use crate::interceptor;
use crate::isolation::{IsolationPolicy, Keys};
use crate::pure_proxy;
use crate::spy_registry::SpyRegistry;
use crate::type_mocker::TypeMocker;
use crate::verify::VerificationQueue;
use decoy_inject::{Injector, ResolutionError};
use decoy_object::{Instance, TypeKey, Value};
use decoy_spy::{Expectation, Spy};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Test-double engine over one container
///
/// ```
/// use decoy_core::AutoMocker;
/// use decoy_object::{ClassDef, ObjectError, Value};
///
/// let service = ClassDef::builder("Service")
///     .method("login", |_, _| Err(ObjectError::thrown("real login")))
///     .build();
///
/// let mocker = AutoMocker::new();
/// mocker.stub(&service, false);
/// let svc = mocker.resolve_instance(&service).unwrap();
/// assert!(svc.call("login", &[]).unwrap().is_null());
/// ```
pub struct AutoMocker {
    config: MockerConfig,
    injector: Injector,
    props: Arc<AutoPropertyStore>,
    spies: SpyRegistry,
    isolation: OnceCell<Arc<IsolationPolicy>>,
    verifications: VerificationQueue,
}

impl AutoMocker {
    /// Create an engine with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockerConfig::default())
    }

    /// Create an engine with configuration
    #[must_use]
    pub fn with_config(config: MockerConfig) -> Self {
        let injector = Injector::with_config(config.injector.clone());
        Self::assemble(config, injector)
    }

    /// Wrap an existing container
    ///
    /// Registrations and hooks already on `injector` are kept.
    #[must_use]
    pub fn with_injector(injector: Injector) -> Self {
        let config = MockerConfig::default().with_injector(injector.config().clone());
        Self::assemble(config, injector)
    }

    fn assemble(config: MockerConfig, injector: Injector) -> Self {
        tracing::debug!(?config, "auto mocker created");
        Self {
            config,
            injector,
            props: Arc::new(AutoPropertyStore::new()),
            spies: SpyRegistry::new(),
            isolation: OnceCell::new(),
            verifications: VerificationQueue::new(),
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    /// Underlying container, for registrations made by the test
    #[inline]
    #[must_use]
    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// Auto-property bags of this engine
    #[inline]
    #[must_use]
    pub fn auto_properties(&self) -> &AutoPropertyStore {
        &self.props
    }

    /// Resolve `key` through the container
    ///
    /// # Errors
    /// Container failures, unchanged.
    pub fn resolve(&self, key: impl Into<TypeKey>) -> Result<Value, ResolutionError> {
        self.injector.resolve(&key.into())
    }

    /// Resolve `key` and require an object
    ///
    /// # Errors
    /// Container failures, unchanged.
    pub fn resolve_instance(&self, key: impl Into<TypeKey>) -> Result<Instance, ResolutionError> {
        self.injector.resolve_instance(&key.into())
    }

    /// Emulate plain data properties on every instance of `key`
    pub fn auto_prop(&self, key: impl Into<TypeKey>) -> &Self {
        let key = key.into();
        interceptor::install_auto_prop(&self.injector.proxy(&key), &self.props);
        self
    }

    /// Stub every method of `key`; properties are stubbed, or auto-propped
    /// when `auto_prop` is set
    pub fn stub(&self, key: impl Into<TypeKey>, auto_prop: bool) -> &Self {
        let key = key.into();
        interceptor::install_stub(&self.injector.proxy(&key), &self.props, auto_prop);
        self
    }

    /// Spy on calls of `method`
    pub fn mock(&self, key: impl Into<TypeKey>, method: &str) -> Spy {
        self.spies.method(&self.injector, &key.into(), method)
    }

    /// Spy on reads of `property`
    pub fn get(&self, key: impl Into<TypeKey>, property: &str) -> Spy {
        self.spies.getter(&self.injector, &key.into(), property)
    }

    /// Spy on writes of `property`
    pub fn set(&self, key: impl Into<TypeKey>, property: &str) -> Spy {
        self.spies.setter(&self.injector, &key.into(), property)
    }

    /// Spy registry of this engine
    #[inline]
    #[must_use]
    pub fn spies(&self) -> &SpyRegistry {
        &self.spies
    }

    /// Resolve every class key outside `keys` (and outside earlier calls) as
    /// a pure proxy
    ///
    /// The first call arms isolation on this engine's container; later
    /// calls only extend the allow list.
    pub fn isolate(&self, keys: impl Into<Keys>) -> &Self {
        let policy = self.isolation.get_or_init(|| {
            let policy = Arc::new(IsolationPolicy::new(
                Arc::clone(&self.props),
                self.config.isolation_auto_prop,
            ));
            self.injector.add_hook(policy.clone());
            tracing::debug!("isolation armed");
            policy
        });
        let added = policy.allow(keys.into());
        tracing::debug!(added, allowed = policy.allowed().len(), "isolation allow list extended");
        self
    }

    /// Check whether isolation is armed
    #[inline]
    #[must_use]
    pub fn is_isolating(&self) -> bool {
        self.isolation.get().is_some()
    }

    /// Isolation allow list, in insertion order
    #[must_use]
    pub fn isolated(&self) -> Vec<TypeKey> {
        self.isolation
            .get()
            .map(|policy| policy.allowed())
            .unwrap_or_default()
    }

    /// Resolve `key` to a stubbed instance allocated without construction
    ///
    /// # Errors
    /// [`ConfigurationError::NotAClass`] for named keys.
    pub fn pure_proxy(
        &self,
        key: impl Into<TypeKey>,
        auto_prop: bool,
    ) -> Result<&Self, ConfigurationError> {
        pure_proxy::install(&self.injector, &key.into(), &self.props, auto_prop)?;
        Ok(self)
    }

    /// Fluent configuration scoped to `key`
    pub fn for_type(&self, key: impl Into<TypeKey>) -> TypeMocker<'_> {
        TypeMocker::new(self, key.into())
    }

    /// Fluent configuration scoped to `key`, set up by `action`
    ///
    /// # Errors
    /// Whatever `action` returns.
    pub fn for_type_with<F>(&self, key: impl Into<TypeKey>, action: F) -> Result<TypeMocker<'_>, MockError>
    where
        F: FnOnce(&TypeMocker<'_>) -> Result<(), MockError>,
    {
        let mocker = self.for_type(key);
        action(&mocker)?;
        Ok(mocker)
    }

    /// Check `expectation` against `spy` when [`verify_all`](Self::verify_all) runs
    pub fn verify(&self, spy: &Spy, expectation: Expectation) -> &Self {
        self.verifications.push(spy.clone(), expectation);
        self
    }

    /// Check every deferred expectation
    ///
    /// # Errors
    /// [`MockError::Verification`] listing every failure.
    pub fn verify_all(&self) -> Result<(), MockError> {
        Ok(self.verifications.check_all()?)
    }

    pub(crate) fn verifications(&self) -> &VerificationQueue {
        &self.verifications
    }
}

impl Default for AutoMocker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AutoMocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMocker")
            .field("config", &self.config)
            .field("injector", &self.injector)
            .field("spies", &self.spies.len())
            .field("isolating", &self.is_isolating())
            .field("verifications", &self.verifications.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_object::ClassDef;
    use pretty_assertions::assert_eq;

    #[test]
    fn isolation_arms_once() {
        let a = ClassDef::builder("A").build();
        let b = ClassDef::builder("B").build();
        let mocker = AutoMocker::new();
        assert!(!mocker.is_isolating());

        mocker.isolate(&a).isolate([&b, &a]);
        assert!(mocker.is_isolating());
        assert_eq!(mocker.injector().hook_count(), 1);
        assert_eq!(mocker.isolated(), vec![TypeKey::from(&a), TypeKey::from(&b)]);
    }

    #[test]
    fn engines_do_not_share_state() {
        let class = ClassDef::builder("Shared").build();
        let first = AutoMocker::new();
        let second = AutoMocker::new();
        first.isolate("unrelated");
        first.mock(&class, "run");

        assert_eq!(second.injector().hook_count(), 0);
        assert!(second.spies().is_empty());
        let obj = second.resolve_instance(&class).unwrap();
        assert_eq!(obj.intercepts().map(|t| t.rule_count()), Some(0));
    }

    #[test]
    fn with_injector_keeps_registrations() {
        let injector = Injector::new();
        injector.register_value("greeting", "hello");
        let mocker = AutoMocker::with_injector(injector);
        assert_eq!(mocker.resolve("greeting").unwrap(), Value::from("hello"));
    }

    #[test]
    fn config_reaches_the_container() {
        let config = MockerConfig::new()
            .with_injector(decoy_inject::InjectorConfig::new().with_max_resolution_depth(3));
        let mocker = AutoMocker::with_config(config);
        assert_eq!(mocker.injector().config().max_resolution_depth, 3);
    }
}
