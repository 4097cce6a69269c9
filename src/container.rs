//! Reusable bundle of resolution settings.

use std::fmt;
use std::sync::Arc;

use crate::cache::{GlobalCache, InstanceCache};
use crate::class::{Class, Injectable};
use crate::error::DiResult;
use crate::namespace::Namespace;
use crate::observer::{BuildObserver, Observers};
use crate::provider::ProviderConfig;
use crate::resolver::{downcast_instance, Resolver};
use crate::AnyArc;

/// IoC container.
///
/// Holds autowire, namespace, providers and an optional shared cache so
/// repeated [`create`](Container::create) calls build with the same
/// configuration. Clones are cheap and share everything, including the
/// shared cache.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, ClassBuilder, Container, ContainerOptions, DiResult, Injectable};
/// use std::sync::Arc;
///
/// struct Pool;
/// impl Injectable for Pool {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         class.singleton();
///     }
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Pool)
///     }
/// }
///
/// let shared = Container::new(ContainerOptions::new().shared_cache(true));
/// assert!(Arc::ptr_eq(&shared.create::<Pool>()?, &shared.create::<Pool>()?));
///
/// let isolated = Container::new(ContainerOptions::new());
/// assert!(!Arc::ptr_eq(&isolated.create::<Pool>()?, &isolated.create::<Pool>()?));
/// # Ok::<(), ferrous_ioc::DiError>(())
/// ```
#[derive(Clone)]
pub struct Container {
    autowire: bool,
    namespace: Namespace,
    providers: Arc<ProviderConfig>,
    cache: Option<InstanceCache>,
    globals: GlobalCache,
    observers: Observers,
}

impl Container {
    /// Container configured by `options`.
    pub fn new(options: ContainerOptions) -> Self {
        Self {
            autowire: options.autowire,
            namespace: options.namespace.unwrap_or_else(Namespace::unique),
            providers: Arc::new(options.providers),
            cache: options.cache,
            globals: options.globals.unwrap_or_else(GlobalCache::process),
            observers: options.observers,
        }
    }

    /// Container bound to an in-progress build: same settings, same cache.
    pub(crate) fn child(resolver: &Resolver) -> Self {
        Self {
            autowire: resolver.autowire,
            namespace: resolver.namespace.clone(),
            providers: resolver.providers.clone(),
            cache: Some(resolver.cache.clone()),
            globals: resolver.globals.clone(),
            observers: resolver.observers.clone(),
        }
    }

    /// Builds a `T` with this container's settings.
    pub fn create<T: Injectable>(&self) -> DiResult<Arc<T>> {
        downcast_instance(self.create_class(&Class::of::<T>())?)
    }

    /// Builds `class` without knowing its type statically.
    pub fn create_class(&self, class: &Class) -> DiResult<AnyArc> {
        self.resolver().build_class(class, None, None)
    }

    /// Namespace used for global singletons.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Whether constructible tags without providers are autowired.
    pub fn autowire(&self) -> bool {
        self.autowire
    }

    /// Providers handed to every build.
    pub fn providers(&self) -> &ProviderConfig {
        &self.providers
    }

    /// The shared cache, when the container keeps one.
    pub fn shared_cache(&self) -> Option<&InstanceCache> {
        self.cache.as_ref()
    }

    /// Global cache this container reads and writes.
    pub fn global_cache(&self) -> &GlobalCache {
        &self.globals
    }

    /// Removes this container's namespace from its global cache.
    pub fn clear_globals(&self) -> bool {
        self.globals.clear_namespace(&self.namespace)
    }

    fn resolver(&self) -> Resolver {
        Resolver {
            autowire: self.autowire,
            providers: self.providers.clone(),
            namespace: self.namespace.clone(),
            cache: self.cache.clone().unwrap_or_default(),
            globals: self.globals.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(ContainerOptions::default())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("autowire", &self.autowire)
            .field("namespace", &self.namespace)
            .field("providers", &self.providers.len())
            .field("shared_cache", &self.cache)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Builder for [`Container`].
///
/// Defaults: autowire on, a fresh unique namespace, no providers, no shared
/// cache (every `create` starts from an empty local cache), the process-wide
/// global cache, no observers.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, ContainerOptions, GlobalCache, Namespace, Provider};
///
/// let container = ContainerOptions::new()
///     .autowire(false)
///     .namespace("reports")
///     .provider(Provider::new("PAGE_SIZE").use_value(50usize))
///     .global_cache(GlobalCache::new())
///     .build();
///
/// assert!(!container.autowire());
/// assert_eq!(container.namespace(), &Namespace::from("reports"));
/// assert_eq!(container.providers().len(), 1);
/// ```
#[derive(Clone)]
pub struct ContainerOptions {
    autowire: bool,
    namespace: Option<Namespace>,
    providers: ProviderConfig,
    cache: Option<InstanceCache>,
    globals: Option<GlobalCache>,
    observers: Observers,
}

impl ContainerOptions {
    /// Default options.
    pub fn new() -> Self {
        Self {
            autowire: true,
            namespace: None,
            providers: ProviderConfig::new(),
            cache: None,
            globals: None,
            observers: Observers::new(),
        }
    }

    /// Enables or disables autowiring.
    pub fn autowire(mut self, autowire: bool) -> Self {
        self.autowire = autowire;
        self
    }

    /// Namespace for global singletons.
    pub fn namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Replaces the provider configuration.
    pub fn providers(mut self, providers: impl Into<ProviderConfig>) -> Self {
        self.providers = providers.into();
        self
    }

    /// Appends one provider or class.
    pub fn provider(mut self, entry: impl Into<crate::ProviderEntry>) -> Self {
        self.providers.push(entry);
        self
    }

    /// `true` gives the container a fresh cache kept across `create` calls;
    /// `false` builds every call from an empty cache.
    pub fn shared_cache(mut self, shared: bool) -> Self {
        self.cache = shared.then(InstanceCache::new);
        self
    }

    /// Uses `cache` as the shared cache, possibly shared with other containers.
    pub fn with_shared_cache(mut self, cache: InstanceCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Global cache to use instead of the process-wide one.
    pub fn global_cache(mut self, globals: GlobalCache) -> Self {
        self.globals = Some(globals);
        self
    }

    /// Attaches a build observer.
    pub fn observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Shorthand for `Container::new(self)`.
    pub fn build(self) -> Container {
        Container::new(self)
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContainerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerOptions")
            .field("autowire", &self.autowire)
            .field("namespace", &self.namespace)
            .field("providers", &self.providers.len())
            .field("shared_cache", &self.cache.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}
