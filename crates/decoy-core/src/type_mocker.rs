//! Fluent per-type configuration

use crate::error::MockError;
use crate::mocker::AutoMocker;
use crate::selector::MemberRef;
use crate::verify::Verifier;
use decoy_object::TypeKey;
use decoy_spy::Spy;

/// Configuration scoped to one key
///
/// Members are named literally (`"login"`) or with a selector
/// (`selector!(|s| s.login)`).
///
/// ```
/// use decoy_core::{selector, AutoMocker};
/// use decoy_object::{ClassDef, Value};
///
/// let service = ClassDef::builder("Service")
///     .method("login", |_, _| Ok(Value::Bool(false)))
///     .build();
///
/// let mocker = AutoMocker::new();
/// let login = mocker
///     .for_type(&service)
///     .stub(true)
///     .mock(selector!(|s| s.login))
///     .unwrap()
///     .returns(true);
///
/// let svc = mocker.resolve_instance(&service).unwrap();
/// assert_eq!(svc.call("login", &[]).unwrap(), Value::Bool(true));
/// assert!(login.was_called());
/// ```
#[derive(Debug)]
pub struct TypeMocker<'a> {
    mocker: &'a AutoMocker,
    key: TypeKey,
}

impl<'a> TypeMocker<'a> {
    pub(crate) fn new(mocker: &'a AutoMocker, key: TypeKey) -> Self {
        Self { mocker, key }
    }

    /// Key being configured
    #[inline]
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Engine this configuration belongs to
    #[inline]
    #[must_use]
    pub fn mocker(&self) -> &'a AutoMocker {
        self.mocker
    }

    /// Stub every method; properties stubbed or auto-propped
    pub fn stub(&self, auto_prop: bool) -> &Self {
        self.mocker.stub(&self.key, auto_prop);
        self
    }

    /// Stub with the configured default auto-property flag
    pub fn stub_default(&self) -> &Self {
        self.stub(self.mocker.config().fluent_stub_auto_prop)
    }

    /// Emulate plain data properties
    pub fn auto_prop(&self) -> &Self {
        self.mocker.auto_prop(&self.key);
        self
    }

    /// Spy on calls of a method
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn mock(&self, method: impl Into<MemberRef>) -> Result<Spy, MockError> {
        let method = method.into().resolve()?;
        Ok(self.mocker.mock(&self.key, &method))
    }

    /// Spy on calls of a method, configured by `configure`
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn mock_with<F>(&self, method: impl Into<MemberRef>, configure: F) -> Result<Spy, MockError>
    where
        F: FnOnce(&Spy, &Verifier<'_>),
    {
        let spy = self.mock(method)?;
        self.apply(&spy, configure);
        Ok(spy)
    }

    /// Spy on reads of a property
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn get(&self, property: impl Into<MemberRef>) -> Result<Spy, MockError> {
        let property = property.into().resolve()?;
        Ok(self.mocker.get(&self.key, &property))
    }

    /// Spy on reads of a property, configured by `configure`
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn get_with<F>(&self, property: impl Into<MemberRef>, configure: F) -> Result<Spy, MockError>
    where
        F: FnOnce(&Spy, &Verifier<'_>),
    {
        let spy = self.get(property)?;
        self.apply(&spy, configure);
        Ok(spy)
    }

    /// Spy on writes of a property
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn set(&self, property: impl Into<MemberRef>) -> Result<Spy, MockError> {
        let property = property.into().resolve()?;
        Ok(self.mocker.set(&self.key, &property))
    }

    /// Spy on writes of a property, configured by `configure`
    ///
    /// # Errors
    /// [`MockError::Selector`] for a malformed selector.
    pub fn set_with<F>(&self, property: impl Into<MemberRef>, configure: F) -> Result<Spy, MockError>
    where
        F: FnOnce(&Spy, &Verifier<'_>),
    {
        let spy = self.set(property)?;
        self.apply(&spy, configure);
        Ok(spy)
    }

    /// Resolve this key to stubbed allocations that skip construction
    ///
    /// # Errors
    /// [`MockError::Configuration`] for named keys.
    pub fn pure_proxy(&self, auto_prop: bool) -> Result<&Self, MockError> {
        self.mocker.pure_proxy(&self.key, auto_prop)?;
        Ok(self)
    }

    /// Run several configuration steps without binding a variable
    ///
    /// # Errors
    /// Whatever `action` returns.
    pub fn configure<F>(&self, action: F) -> Result<&Self, MockError>
    where
        F: FnOnce(&Self) -> Result<(), MockError>,
    {
        action(self)?;
        Ok(self)
    }

    fn apply<F>(&self, spy: &Spy, configure: F)
    where
        F: FnOnce(&Spy, &Verifier<'_>),
    {
        let verifier = Verifier::new(spy.clone(), self.mocker.verifications());
        configure(spy, &verifier);
    }
}
