//! Error types for the mocking engine
//!
//! Provides the engine-level taxonomy:
//! - Configuration mistakes (pure-proxying a named key, bad TOML)
//! - Malformed member selectors
//! - Container failures, carried unchanged
//! - Failed deferred verifications

use decoy_inject::ResolutionError;
use decoy_spy::VerificationError;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Engine misconfiguration
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Selector could not be reduced to a member name
    #[error("selector error: {0}")]
    Selector(#[from] SelectorParseError),

    /// Container failure
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Deferred expectation failed
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl MockError {
    /// Check if this is a failed verification
    #[inline]
    #[must_use]
    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_))
    }
}

/// Engine misconfiguration
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Pure proxies borrow a class shape; named keys have none
    #[error("cannot pure-proxy {key}: not a class key")]
    NotAClass {
        /// Offending key
        key: String,
    },

    /// Configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Selector text outside the accepted grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    /// Nothing to parse
    #[error("empty selector")]
    Empty,

    /// Not a single parameter followed by a single member access
    #[error("unsupported selector `{selector}`: expected `|x| x.member` or `x => x.member`")]
    Malformed {
        /// Selector text as written
        selector: String,
    },

    /// Body accesses something other than the parameter
    #[error("selector `{selector}` reads from `{found}`, not its parameter `{param}`")]
    ForeignReceiver {
        /// Selector text as written
        selector: String,
        /// Declared parameter
        param: String,
        /// Receiver actually read
        found: String,
    },
}
