//! Decoy Spies
//!
//! Call-recording spies and the expectations checked against them.
//!
//! - [`Spy`]: shared recorder with a configurable answer
//! - [`Expectation`] / [`ArgMatcher`]: assertions over recorded calls
//! - [`VerificationError`]: what a failed assertion reports

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod matcher;
mod spy;

// Re-exports
pub use error::VerificationError;
pub use matcher::{ArgMatcher, Expectation};
pub use spy::{Call, FakeFn, Spy, SpyBehavior};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
