//! Decoy Injector
//!
//! A small dependency-injection container over the decoy object model.
//!
//! # Core Concepts
//!
//! - [`Injector`]: registrations, recursive resolution, per-key proxies
//! - [`Registration`] / [`Lifetime`]: how a key is produced and cached
//! - [`ResolveHook`]: per-container hook chain run before every resolution
//!
//! # Example
//!
//! ```
//! use decoy_inject::Injector;
//! use decoy_object::{ClassDef, TypeKey, Value};
//!
//! let config = ClassDef::builder("Config")
//!     .field("port", 8080)
//!     .build();
//! let server = ClassDef::builder("Server")
//!     .dependency("config", &config)
//!     .method("port", |this, _| this.get("config")?.expect_object("config")?.get("port"))
//!     .build();
//!
//! let injector = Injector::new();
//! let obj = injector.resolve_instance(&TypeKey::from(&server)).unwrap();
//! assert_eq!(obj.call("port", &[]).unwrap(), Value::Int(8080));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod hook;
mod injector;
mod registration;

// Re-exports
pub use config::InjectorConfig;
pub use error::ResolutionError;
pub use hook::{ResolveHook, ResolveRequest};
pub use injector::{Injector, InjectorBuilder};
pub use registration::{FactoryFn, Lifetime, Provider, Registration};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
