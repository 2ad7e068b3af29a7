//! Engine configuration

use crate::error::ConfigurationError;
use decoy_inject::InjectorConfig;
use serde::{Deserialize, Serialize};

/// Engine configuration
///
/// ```
/// use decoy_core::MockerConfig;
///
/// let config = MockerConfig::from_toml_str(
///     r#"
///     isolation_auto_prop = false
///
///     [injector]
///     max_resolution_depth = 8
///     "#,
/// )
/// .unwrap();
/// assert!(!config.isolation_auto_prop);
/// assert_eq!(config.injector.max_resolution_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockerConfig {
    /// Whether isolation proxies emulate data properties
    pub isolation_auto_prop: bool,
    /// Auto-property flag used by `TypeMocker::stub_default`
    pub fluent_stub_auto_prop: bool,
    /// Configuration of the container the engine creates
    pub injector: InjectorConfig,
}

impl MockerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys take their defaults
    ///
    /// # Errors
    /// [`ConfigurationError::Toml`] if the document is malformed.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(document)?)
    }

    /// With isolation auto-property mode
    #[inline]
    #[must_use]
    pub fn with_isolation_auto_prop(mut self, enabled: bool) -> Self {
        self.isolation_auto_prop = enabled;
        self
    }

    /// With fluent stub default
    #[inline]
    #[must_use]
    pub fn with_fluent_stub_auto_prop(mut self, enabled: bool) -> Self {
        self.fluent_stub_auto_prop = enabled;
        self
    }

    /// With container configuration
    #[inline]
    #[must_use]
    pub fn with_injector(mut self, injector: InjectorConfig) -> Self {
        self.injector = injector;
        self
    }
}

impl Default for MockerConfig {
    fn default() -> Self {
        Self {
            isolation_auto_prop: true,
            fluent_stub_auto_prop: false,
            injector: InjectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_inject::Lifetime;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(MockerConfig::from_toml_str("").unwrap(), MockerConfig::default());
    }

    #[test]
    fn nested_injector_section() {
        let config = MockerConfig::from_toml_str(
            "fluent_stub_auto_prop = true\n[injector]\ndefault_lifetime = \"singleton\"\n",
        )
        .unwrap();
        assert!(config.fluent_stub_auto_prop);
        assert!(config.isolation_auto_prop);
        assert_eq!(config.injector.default_lifetime, Lifetime::Singleton);
        assert_eq!(config.injector.max_resolution_depth, 64);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = MockerConfig::from_toml_str("isolation_auto_prop = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigurationError::Toml(_)));
    }

    #[test]
    fn builder_setters() {
        let config = MockerConfig::new()
            .with_isolation_auto_prop(false)
            .with_fluent_stub_auto_prop(true);
        assert!(!config.isolation_auto_prop);
        assert!(config.fluent_stub_auto_prop);
    }
}
