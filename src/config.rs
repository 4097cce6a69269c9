//! Container configuration loaded from the environment or JSON.
//!
//! [`ContainerConfig`] is plain data: the parts of a container that can be
//! described without code (autowire, namespace name, shared-cache mode).
//! Providers and observers are code and are added on the resulting
//! [`ContainerOptions`].

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::container::ContainerOptions;
#[cfg(feature = "config")]
use crate::error::{DiError, DiResult};
use crate::namespace::Namespace;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "FERROUS_IOC";

/// Data-only container settings.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::config::ContainerConfig;
/// use ferrous_ioc::Namespace;
///
/// let config = ContainerConfig {
///     autowire: false,
///     namespace: Some("tenant-a".to_string()),
///     shared_cache: true,
/// };
/// let container = config.into_options().build();
/// assert!(!container.autowire());
/// assert_eq!(container.namespace(), &Namespace::from("tenant-a"));
/// assert!(container.shared_cache().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Synthesise providers for constructible tags nobody registered
    pub autowire: bool,
    /// Named namespace for global singletons; a fresh unique one when unset
    pub namespace: Option<String>,
    /// Keep one instance cache across every `create` on the container
    pub shared_cache: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            autowire: true,
            namespace: None,
            shared_cache: false,
        }
    }
}

impl ContainerConfig {
    /// Reads `FERROUS_IOC_AUTOWIRE`, `FERROUS_IOC_NAMESPACE` and
    /// `FERROUS_IOC_SHARED_CACHE`. Unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let prefix = prefix.to_uppercase();
        let var = |key: &str| env::var(format!("{}_{}", prefix, key)).ok();
        let defaults = Self::default();

        Self {
            autowire: var("AUTOWIRE")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.autowire),
            namespace: var("NAMESPACE").filter(|v| !v.trim().is_empty()),
            shared_cache: var("SHARED_CACHE")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.shared_cache),
        }
    }

    /// Parses a JSON document; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|_| DiError::TypeMismatch("Invalid JSON configuration"))
    }

    /// Serialises to a JSON document.
    #[cfg(feature = "config")]
    pub fn to_json_string(&self) -> DiResult<String> {
        serde_json::to_string(self).map_err(|_| DiError::TypeMismatch("Invalid JSON configuration"))
    }

    /// Container options carrying these settings.
    pub fn into_options(self) -> ContainerOptions {
        let mut options = ContainerOptions::new()
            .autowire(self.autowire)
            .shared_cache(self.shared_cache);
        if let Some(name) = self.namespace {
            options = options.namespace(Namespace::from(name));
        }
        options
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
