//! Application and container configuration.
//!
//! [`AppConfig`] is the read-only key/value store consulted for primitive
//! constructor parameters; it is built once at boot and never mutated.
//! [`ContainerConfig`] selects the container-wide lifecycle policy.

use crate::error::BuildError;
use indexmap::IndexMap;

/// A configuration parameter value: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// A single string parameter.
    Text(String),
    /// A list-of-strings parameter.
    List(Vec<String>),
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        ConfigValue::List(value)
    }
}

/// Read-only application configuration.
///
/// Holds named parameters for configuration-bound constructor arguments, the
/// ordered list of pre-hook service ids, and the debug flag.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    parameters: IndexMap<String, ConfigValue>,
    before_actions: Vec<String>,
    debug: bool,
}

impl AppConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Append a pre-hook service id. Hooks run in the order added.
    pub fn before_action(mut self, service_id: impl Into<String>) -> Self {
        self.before_actions.push(service_id.into());
        self
    }

    /// Enable debug mode (verbose dispatch logging only).
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.parameters.get(name)
    }

    /// The ordered pre-hook service ids.
    pub fn before_actions(&self) -> &[String] {
        &self.before_actions
    }

    /// Whether debug mode is enabled.
    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Container-wide lifecycle policy.
///
/// The policy is global: either every service is a singleton within one
/// container, or every `get` builds a fresh instance. There is no per-service
/// override. The two bootstrap entries (configuration and the container's
/// self-handle) are always singletons regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    singleton: bool,
    lazy: bool,
}

impl ContainerConfig {
    /// Create a container configuration.
    ///
    /// Eager construction (`lazy = false`) is unsupported and fails fast.
    pub fn new(lazy: bool, singleton: bool) -> Result<Self, BuildError> {
        if !lazy {
            return Err(BuildError::EagerNotSupported);
        }
        Ok(Self { singleton, lazy })
    }

    /// A lazy singleton container (the common case).
    pub fn singleton() -> Self {
        Self {
            singleton: true,
            lazy: true,
        }
    }

    /// A lazy transient container.
    pub fn transient() -> Self {
        Self {
            singleton: false,
            lazy: true,
        }
    }

    /// Whether resolved instances are cached for the container's lifetime.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Whether services are constructed on first use. Always true.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::singleton()
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigValue, ContainerConfig};
    use crate::error::BuildError;

    #[test]
    fn eager_configuration_fails_fast() {
        let result = ContainerConfig::new(false, true);
        assert!(matches!(result, Err(BuildError::EagerNotSupported)));
    }

    #[test]
    fn lazy_configuration_is_accepted() {
        let config = ContainerConfig::new(true, false).unwrap();
        assert!(config.is_lazy());
        assert!(!config.is_singleton());
    }

    #[test]
    fn parameters_are_looked_up_by_name() {
        let config = AppConfig::new()
            .parameter("dsn", "sqlite::memory:")
            .parameter("origins", vec!["a".to_string(), "b".to_string()]);

        assert_eq!(
            config.get("dsn"),
            Some(&ConfigValue::Text("sqlite::memory:".into()))
        );
        assert!(matches!(config.get("origins"), Some(ConfigValue::List(v)) if v.len() == 2));
        assert_eq!(config.get("missing"), None);
    }
}
