//! Class definitions
//!
//! Provides [`ClassDef`] (the behavioral surface of a type) and [`ClassRef`],
//! the identity-compared handle used as a resolution key.
//!
//! A class keeps its method and accessor tables apart from its construction
//! path (field initializers, injected dependencies, constructor body). That
//! split is what lets a bare instance be allocated from the class without
//! running any of its construction code.

use crate::error::ObjectError;
use crate::instance::Instance;
use crate::key::TypeKey;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Method body: receives the receiver and the argument list
pub type MethodFn = Arc<dyn Fn(&Instance, &[Value]) -> Result<Value, ObjectError> + Send + Sync>;

/// Accessor getter body
pub type GetterFn = Arc<dyn Fn(&Instance) -> Result<Value, ObjectError> + Send + Sync>;

/// Accessor setter body
pub type SetterFn = Arc<dyn Fn(&Instance, Value) -> Result<(), ObjectError> + Send + Sync>;

/// Constructor body: receives the half-built receiver and the resolved dependencies
pub type ConstructorFn = Arc<dyn Fn(&Instance, &[Value]) -> Result<(), ObjectError> + Send + Sync>;

/// Constructor dependency: the key to resolve and the field it is stored in
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Field on the new instance receiving the resolved value
    pub field: String,
    /// Key resolved by the container
    pub key: TypeKey,
}

/// Behavioral surface and construction path of a type
pub struct ClassDef {
    name: String,
    dependencies: Vec<Dependency>,
    fields: IndexMap<String, Value>,
    methods: IndexMap<String, MethodFn>,
    getters: IndexMap<String, GetterFn>,
    setters: IndexMap<String, SetterFn>,
    constructor: Option<ConstructorFn>,
}

impl ClassDef {
    /// Start building a class
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Class name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared constructor dependencies, in parameter order
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Look up a method
    #[inline]
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    /// Look up an accessor getter
    #[inline]
    #[must_use]
    pub fn getter(&self, name: &str) -> Option<&GetterFn> {
        self.getters.get(name)
    }

    /// Look up an accessor setter
    #[inline]
    #[must_use]
    pub fn setter(&self, name: &str) -> Option<&SetterFn> {
        self.setters.get(name)
    }

    /// Check whether `name` is a method
    #[inline]
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Check whether `name` is a derived (accessor) property
    #[inline]
    #[must_use]
    pub fn is_accessor(&self, name: &str) -> bool {
        self.getters.contains_key(name) || self.setters.contains_key(name)
    }

    /// Method names, in declaration order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Declared data fields with their initial values
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Shared handle to a class definition
///
/// Equality and hashing use pointer identity: two structurally identical
/// definitions are different classes.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassDef>);

impl ClassRef {
    /// Wrap a class definition
    #[inline]
    #[must_use]
    pub fn new(def: ClassDef) -> Self {
        Self(Arc::new(def))
    }

    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Allocate an instance sharing this class's surface without running
    /// field initializers, dependency injection or the constructor body
    #[must_use]
    pub fn allocate(&self) -> Instance {
        Instance::allocate(self.clone())
    }

    /// Full construction: assign field initializers, store the resolved
    /// dependencies in their fields, then run the constructor body
    ///
    /// # Errors
    /// Propagates any fault raised by the constructor body.
    pub fn construct(&self, dependencies: &[Value]) -> Result<Instance, ObjectError> {
        let instance = self.allocate();
        for (field, value) in &self.0.fields {
            instance.set_real(field, value.clone())?;
        }
        for (dep, value) in self.0.dependencies.iter().zip(dependencies) {
            instance.set_real(&dep.field, value.clone())?;
        }
        if let Some(ctor) = &self.0.constructor {
            ctor(&instance, dependencies)?;
        }
        tracing::trace!(class = %self.0.name, id = %instance.id(), "constructed instance");
        Ok(instance)
    }
}

impl Deref for ClassRef {
    type Target = ClassDef;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}@{:p}", self.0.name, Arc::as_ptr(&self.0))
    }
}

/// Builder for [`ClassDef`]
pub struct ClassBuilder {
    def: ClassDef,
}

impl ClassBuilder {
    /// Create builder for a class named `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: ClassDef {
                name: name.into(),
                dependencies: Vec::new(),
                fields: IndexMap::new(),
                methods: IndexMap::new(),
                getters: IndexMap::new(),
                setters: IndexMap::new(),
                constructor: None,
            },
        }
    }

    /// Declare a constructor dependency stored in `field`
    #[must_use]
    pub fn dependency(mut self, field: impl Into<String>, key: impl Into<TypeKey>) -> Self {
        self.def.dependencies.push(Dependency {
            field: field.into(),
            key: key.into(),
        });
        self
    }

    /// Declare a data field with its initial value
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
        self.def.fields.insert(name.into(), initial.into());
        self
    }

    /// Define a method
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.def.methods.insert(name.into(), Arc::new(body));
        self
    }

    /// Define an accessor getter (a derived property)
    #[must_use]
    pub fn getter<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.def.getters.insert(name.into(), Arc::new(body));
        self
    }

    /// Define an accessor setter
    #[must_use]
    pub fn setter<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Instance, Value) -> Result<(), ObjectError> + Send + Sync + 'static,
    {
        self.def.setters.insert(name.into(), Arc::new(body));
        self
    }

    /// Define the constructor body
    #[must_use]
    pub fn constructor<F>(mut self, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<(), ObjectError> + Send + Sync + 'static,
    {
        self.def.constructor = Some(Arc::new(body));
        self
    }

    /// Finish the definition
    #[must_use]
    pub fn build(self) -> ClassRef {
        ClassRef::new(self.def)
    }
}
