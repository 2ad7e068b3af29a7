//! Error types for the container

use decoy_object::{ObjectError, TypeKey};

/// Resolution failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Named key without registration
    #[error("no registration for {key}")]
    Unregistered {
        /// Requested key
        key: String,
    },

    /// Key requested while already being resolved
    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle {
        /// Keys on the cycle, ending with the repeated one
        path: Vec<String>,
    },

    /// Dependency chain deeper than the configured limit
    #[error("resolution depth {limit} exceeded while resolving {key}")]
    DepthExceeded {
        /// Key that would exceed the limit
        key: String,
        /// Configured maximum depth
        limit: usize,
    },

    /// Constructor body or field initializer raised a fault
    #[error("constructing {key} failed: {source}")]
    Construction {
        /// Class being constructed
        key: String,
        /// Fault raised by user code
        #[source]
        source: ObjectError,
    },

    /// Registered factory failed
    #[error("factory for {key} failed: {reason}")]
    Factory {
        /// Key the factory was registered for
        key: String,
        /// Failure description
        reason: String,
    },

    /// A resolve hook refused the request
    #[error("resolve hook rejected {key}: {reason}")]
    Hook {
        /// Rejected key
        key: String,
        /// Rejection reason
        reason: String,
    },
}

impl ResolutionError {
    /// Create an unregistered-key error
    #[inline]
    pub fn unregistered(key: &TypeKey) -> Self {
        Self::Unregistered {
            key: key.to_string(),
        }
    }

    /// Create a factory failure
    #[inline]
    pub fn factory(key: &TypeKey, reason: impl Into<String>) -> Self {
        Self::Factory {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a hook rejection
    #[inline]
    pub fn hook(key: &TypeKey, reason: impl Into<String>) -> Self {
        Self::Hook {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Fault raised by user code during construction, if that is the cause
    #[must_use]
    pub fn thrown(&self) -> Option<&ObjectError> {
        match self {
            Self::Construction { source, .. } if source.is_thrown() => Some(source),
            _ => None,
        }
    }
}
