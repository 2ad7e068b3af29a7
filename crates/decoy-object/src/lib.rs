//! Decoy Object Model
//!
//! Dynamic objects whose members can be intercepted per resolution key.
//!
//! # Core Concepts
//!
//! - [`Value`]: dynamically typed value with distinct `Null` and `Undefined`
//! - [`ClassDef`] / [`ClassRef`]: behavioral surface plus construction path
//! - [`Instance`]: shared object consulting an [`InterceptTable`] on access
//! - [`ProxyHandle`]: registers get/set/method rules, specific or wildcard
//! - [`TypeKey`]: identity of a resolvable unit (class or string)
//!
//! # Example
//!
//! ```
//! use decoy_object::{ClassDef, InterceptTable, Member, ProxyHandle, Value};
//!
//! let service = ClassDef::builder("Service")
//!     .method("ping", |_, _| Ok(Value::from("pong")))
//!     .build();
//!
//! let obj = service.construct(&[]).unwrap();
//! assert_eq!(obj.call("ping", &[]).unwrap(), Value::from("pong"));
//!
//! let proxy = ProxyHandle::new(InterceptTable::new("Service"));
//! proxy.method(Member::Wildcard).instead(|_, _, _| Ok(Value::Null));
//! obj.attach(proxy.table().clone());
//! assert!(obj.call("ping", &[]).unwrap().is_null());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod class;
mod error;
mod instance;
mod intercept;
mod key;
mod value;

// Re-exports
pub use class::{
    ClassBuilder, ClassDef, ClassRef, ConstructorFn, Dependency, GetterFn, MethodFn, SetterFn,
};
pub use error::ObjectError;
pub use instance::{Instance, InstanceId};
pub use intercept::{
    GetIntercept, GetRule, InterceptTable, Member, MethodIntercept, MethodRule, ProxyHandle,
    RuleKind, SetIntercept, SetRule,
};
pub use key::TypeKey;
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
