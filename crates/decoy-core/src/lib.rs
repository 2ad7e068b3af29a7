//! Decoy Core - auto-mocking for dependency-injected object graphs
//!
//! Replaces resolved objects, or any subset of their members, with
//! controllable stand-ins without touching the classes themselves.
//!
//! # Core Concepts
//!
//! - [`AutoMocker`]: engine owning a container, spies and isolation state
//! - Stub / auto-property modes: wildcard answers for every member of a key
//! - Spies: `mock`, `get` and `set` return one memoized [`Spy`] per member
//! - Pure proxies: allocations that never run the real constructor
//! - Isolation: every class off the allow list resolves as a pure proxy
//! - [`TypeMocker`]: fluent configuration, members named by string or
//!   [`selector!`]
//!
//! # Example
//!
//! ```
//! use decoy_core::AutoMocker;
//! use decoy_object::{ClassDef, ObjectError, Value};
//!
//! let service = ClassDef::builder("LoginService")
//!     .method("login", |_, _| Err(ObjectError::thrown("network")))
//!     .build();
//! let model = ClassDef::builder("LoginModel")
//!     .dependency("service", &service)
//!     .method("submit", |this, args| {
//!         this.get("service")?.expect_object("service")?.call("login", args)
//!     })
//!     .build();
//!
//! let mocker = AutoMocker::new();
//! mocker.isolate(&model);
//! let login = mocker.mock(&service, "login").returns(true);
//!
//! let vm = mocker.resolve_instance(&model).unwrap();
//! assert_eq!(vm.call("submit", &[Value::from("u")]).unwrap(), Value::Bool(true));
//! assert!(login.was_called_with(&[Value::from("u")]));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod auto_prop;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod isolation;
pub mod mocker;
pub mod pure_proxy;
pub mod selector;
pub mod spy_registry;
pub mod type_mocker;
pub mod verify;

// Re-exports for convenience
pub use auto_prop::{AutoPropertyBag, AutoPropertyStore};
pub use config::MockerConfig;
pub use error::{ConfigurationError, MockError, SelectorParseError};
pub use isolation::{IsolationPolicy, Keys};
pub use mocker::AutoMocker;
pub use selector::{MemberRef, Selector};
pub use spy_registry::SpyRegistry;
pub use type_mocker::TypeMocker;
pub use verify::{VerificationQueue, Verifier};

pub use decoy_spy::{ArgMatcher, Expectation, Spy, VerificationError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing tests with decoy
    pub use crate::selector;
    pub use crate::{
        ArgMatcher, AutoMocker, Expectation, MemberRef, MockError, MockerConfig, Spy, TypeMocker,
    };
    pub use decoy_inject::{Injector, Lifetime};
    pub use decoy_object::{ClassDef, ClassRef, Instance, ObjectError, TypeKey, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
