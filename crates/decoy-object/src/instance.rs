//! Object instances
//!
//! Provides [`Instance`], a shared object whose property reads, writes and
//! method calls first consult an attached [`InterceptTable`] and only then
//! fall through to the real members of its class.
//!
//! No lock is held while a rule or member body runs, so bodies may freely
//! re-enter the same instance.

use crate::class::ClassRef;
use crate::error::ObjectError;
use crate::intercept::InterceptTable;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identity of an allocated instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct InstanceInner {
    id: InstanceId,
    class: ClassRef,
    fields: RwLock<IndexMap<String, Value>>,
    intercepts: RwLock<Option<InterceptTable>>,
}

/// Shared handle to an object
///
/// Cloning shares the object; equality is identity.
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

impl Instance {
    pub(crate) fn allocate(class: ClassRef) -> Self {
        Self(Arc::new(InstanceInner {
            id: InstanceId::new(),
            class,
            fields: RwLock::new(IndexMap::new()),
            intercepts: RwLock::new(None),
        }))
    }

    /// Unique id
    #[inline]
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.0.id
    }

    /// Class this object was allocated from
    #[inline]
    #[must_use]
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Name of the class
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Attach an intercept table, replacing any previous one
    pub fn attach(&self, table: InterceptTable) {
        *self.0.intercepts.write() = Some(table);
    }

    /// Attach `table` unless a table is already attached
    ///
    /// Returns `true` if `table` was attached.
    pub fn attach_if_unset(&self, table: InterceptTable) -> bool {
        let mut slot = self.0.intercepts.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(table);
        true
    }

    /// Attached intercept table, if any
    #[must_use]
    pub fn intercepts(&self) -> Option<InterceptTable> {
        self.0.intercepts.read().clone()
    }

    /// Read a property, honoring intercept rules
    ///
    /// # Errors
    /// Propagates faults from the rule or the accessor body.
    pub fn get(&self, property: &str) -> Result<Value, ObjectError> {
        if let Some(rule) = self.intercepts().and_then(|t| t.get_rule(property)) {
            tracing::trace!(class = %self.class_name(), property, "get intercepted");
            return rule(self, property);
        }
        self.get_real(property)
    }

    /// Write a property, honoring intercept rules
    ///
    /// # Errors
    /// Propagates faults from the rule or the accessor body.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        let value = value.into();
        if let Some(rule) = self.intercepts().and_then(|t| t.set_rule(property)) {
            tracing::trace!(class = %self.class_name(), property, "set intercepted");
            return rule(self, property, value);
        }
        self.set_real(property, value)
    }

    /// Call a method, honoring intercept rules
    ///
    /// # Errors
    /// Propagates faults from the rule or the method body;
    /// [`ObjectError::MissingMethod`] if nothing answers the call.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, ObjectError> {
        if let Some(rule) = self.intercepts().and_then(|t| t.method_rule(method)) {
            tracing::trace!(class = %self.class_name(), method, "call intercepted");
            return rule(self, method, args);
        }
        self.call_real(method, args)
    }

    /// Read a property through the class only: accessor getter, then own field
    ///
    /// A property that was never assigned reads as `Undefined`.
    ///
    /// # Errors
    /// Propagates faults from the accessor body.
    pub fn get_real(&self, property: &str) -> Result<Value, ObjectError> {
        if let Some(getter) = self.0.class.getter(property) {
            let getter = Arc::clone(getter);
            return getter(self);
        }
        Ok(self
            .0
            .fields
            .read()
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    /// Write a property through the class only: accessor setter, then own field
    ///
    /// # Errors
    /// [`ObjectError::TypeMismatch`] when writing a getter-only accessor;
    /// otherwise propagates faults from the setter body.
    pub fn set_real(&self, property: &str, value: Value) -> Result<(), ObjectError> {
        if let Some(setter) = self.0.class.setter(property) {
            let setter = Arc::clone(setter);
            return setter(self, value);
        }
        if self.0.class.getter(property).is_some() {
            return Err(ObjectError::TypeMismatch(format!(
                "cannot assign to read-only property {}.{property}",
                self.class_name()
            )));
        }
        self.0.fields.write().insert(property.to_string(), value);
        Ok(())
    }

    /// Call a method of the class directly
    ///
    /// # Errors
    /// [`ObjectError::MissingMethod`] if the class has no such method;
    /// otherwise propagates faults from the body.
    pub fn call_real(&self, method: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let body = self
            .0
            .class
            .method(method)
            .cloned()
            .ok_or_else(|| ObjectError::MissingMethod {
                class: self.class_name().to_string(),
                method: method.to_string(),
            })?;
        body(self, args)
    }

    /// Names of own fields that hold a value
    #[must_use]
    pub fn own_fields(&self) -> Vec<String> {
        self.0.fields.read().keys().cloned().collect()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class_name())
            .field("id", &self.0.id)
            .field("intercepted", &self.0.intercepts.read().is_some())
            .finish_non_exhaustive()
    }
}
