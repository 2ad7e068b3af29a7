//! Container configuration

use crate::registration::Lifetime;
use serde::{Deserialize, Serialize};

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    /// Deepest dependency chain resolved before giving up
    pub max_resolution_depth: usize,
    /// Lifetime used for class keys resolved without an explicit registration
    pub default_lifetime: Lifetime,
}

impl InjectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum resolution depth
    #[inline]
    #[must_use]
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// With default lifetime
    #[inline]
    #[must_use]
    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 64,
            default_lifetime: Lifetime::Transient,
        }
    }
}
