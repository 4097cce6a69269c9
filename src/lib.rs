//! # ferrous-ioc
//!
//! Tag-based inversion-of-control resolver for Rust: build object graphs from
//! constructor metadata, with autowiring, provider overrides and namespaced
//! global singletons.
//!
//! ## Features
//!
//! - **Autowiring**: constructible dependencies build themselves when nobody registered a provider
//! - **Tags**: resolve by type, by string name, or by unique [`Symbol`]
//! - **Providers**: precomputed values, factories, or classes, overridable per call
//! - **Provider hints**: classes ship defaults that callers may replace
//! - **Singletons**: per-build (or shared) caching, plus global caching per [`Namespace`]
//! - **Circular dependency detection**: cycles fail with the full path instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{create, create_with, Arguments, ClassBuilder, DiResult, Injectable, Provider};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: Arc<String>,
//! }
//!
//! impl Injectable for Database {
//!     fn describe(class: &mut ClassBuilder<Self>) {
//!         class
//!             .param_tagged::<String>("DATABASE_URL")
//!             .hint(Provider::new("DATABASE_URL").use_value(String::from("postgres://localhost")))
//!             .singleton();
//!     }
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(Database { url: args.next()? })
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn describe(class: &mut ClassBuilder<Self>) {
//!         class.param::<Database>();
//!     }
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(UserService { db: args.next()? })
//!     }
//! }
//!
//! // Autowired, using the class hint
//! let service = create::<UserService>()?;
//! assert_eq!(service.db.url.as_str(), "postgres://localhost");
//!
//! // Caller providers beat hints
//! let service = create_with::<UserService>(
//!     Provider::new("DATABASE_URL").use_value(String::from("postgres://test")),
//! )?;
//! assert_eq!(service.db.url.as_str(), "postgres://test");
//! # Ok::<(), ferrous_ioc::DiError>(())
//! ```
//!
//! ## Caching
//!
//! - **Singleton**: one instance per build, or per container with a shared cache
//! - **Global**: one instance per namespace until [`clear_namespace`] or [`clear_all_namespaces`]
//! - Neither: a fresh instance for every dependency edge
//!
//! ## Containers
//!
//! ```rust
//! use ferrous_ioc::{Arguments, ClassBuilder, ContainerOptions, DiResult, Injectable, Provider};
//! use std::sync::Arc;
//!
//! struct Settings {
//!     retries: u32,
//! }
//!
//! impl Injectable for Settings {
//!     fn describe(class: &mut ClassBuilder<Self>) {
//!         class.param_tagged::<u32>("RETRIES").global();
//!     }
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(Settings { retries: args.next_cloned()? })
//!     }
//! }
//!
//! let container = ContainerOptions::new()
//!     .namespace("jobs")
//!     .provider(Provider::new("RETRIES").use_value(3u32))
//!     .build();
//!
//! let a = container.create::<Settings>()?;
//! let b = container.create::<Settings>()?;
//! assert_eq!(a.retries, 3);
//! assert!(Arc::ptr_eq(&a, &b));
//! # container.clear_globals();
//! # Ok::<(), ferrous_ioc::DiError>(())
//! ```

use std::any::Any;
use std::sync::Arc;

// Module declarations
pub mod cache;
pub mod class;
pub mod config;
pub mod container;
pub mod error;
pub mod namespace;
pub mod observer;
pub mod provider;
pub mod tag;

mod internal;
mod resolver;

// Re-exports
pub use cache::{GlobalCache, InstanceCache};
pub use class::{Arguments, Class, ClassBuilder, ClassMetadata, Injectable};
pub use container::{Container, ContainerOptions};
pub use error::{DiError, DiResult};
pub use namespace::Namespace;
pub use observer::{BuildObserver, CacheTier, LoggingObserver, MetricsObserver};
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use provider::{FactoryContext, FactoryFn, Provider, ProviderConfig, ProviderEntry, ProviderRegistry};
pub use tag::{Symbol, Tag};

use crate::observer::Observers;
use crate::resolver::{downcast_instance, Resolver};

/// Type-erased shared instance, as stored in caches and providers.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Named options for [`build`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{BuildOptions, Namespace};
///
/// let options = BuildOptions { namespace: Namespace::from("batch"), ..Default::default() };
/// assert!(options.autowire);
/// assert_eq!(options.global, None);
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Autowire constructible tags without providers (default `true`)
    pub autowire: bool,
    /// Caller providers
    pub providers: ProviderConfig,
    /// Namespace for global singletons (default [`Namespace::Default`])
    pub namespace: Namespace,
    /// Forces global caching of the target on or off; `None` lets the class decide
    pub global: Option<bool>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            autowire: true,
            providers: ProviderConfig::new(),
            namespace: Namespace::Default,
            global: None,
        }
    }
}

impl BuildOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables autowiring.
    pub fn autowire(mut self, autowire: bool) -> Self {
        self.autowire = autowire;
        self
    }

    /// Sets the caller providers.
    pub fn providers(mut self, providers: impl Into<ProviderConfig>) -> Self {
        self.providers = providers.into();
        self
    }

    /// Sets the namespace.
    pub fn namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Forces global caching of the target.
    pub fn global(mut self, global: bool) -> Self {
        self.global = Some(global);
        self
    }
}

fn build_top_level<T: Injectable>(
    autowire: bool,
    providers: ProviderConfig,
    namespace: Namespace,
    singleton: Option<bool>,
    global: Option<bool>,
) -> DiResult<Arc<T>> {
    let resolver = Resolver {
        autowire,
        providers: Arc::new(providers),
        namespace,
        cache: InstanceCache::new(),
        globals: GlobalCache::process(),
        observers: Observers::new(),
    };
    downcast_instance(resolver.build_class(&Class::of::<T>(), singleton, global)?)
}

/// Builds a `T` with autowiring and no providers.
///
/// Uses a fresh local cache and the default namespace of the process-wide
/// global cache.
pub fn create<T: Injectable>() -> DiResult<Arc<T>> {
    create_configured::<T>(true, ProviderConfig::new())
}

/// Builds a `T` with autowiring and the given providers.
pub fn create_with<T: Injectable>(providers: impl Into<ProviderConfig>) -> DiResult<Arc<T>> {
    create_configured::<T>(true, providers)
}

/// Builds a `T` with explicit autowire and providers.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{create_configured, providers, Arguments, ClassBuilder, DiError, DiResult, Injectable};
/// use std::sync::Arc;
///
/// struct Dep;
/// impl Injectable for Dep {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Dep)
///     }
/// }
///
/// struct Target {
///     _dep: Arc<Dep>,
/// }
/// impl Injectable for Target {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         class.param::<Dep>();
///     }
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Target { _dep: args.next()? })
///     }
/// }
///
/// assert!(matches!(
///     create_configured::<Target>(false, providers![]),
///     Err(DiError::UnknownProvider(_))
/// ));
/// ```
pub fn create_configured<T: Injectable>(autowire: bool, providers: impl Into<ProviderConfig>) -> DiResult<Arc<T>> {
    build_top_level::<T>(autowire, providers.into(), Namespace::Default, None, None)
}

/// Builds a `T` from named options.
///
/// The target itself is never put in the local cache; `options.global`
/// forces or suppresses global caching of the target.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{build, clear_namespace, Arguments, BuildOptions, DiResult, Injectable};
/// use std::sync::Arc;
///
/// struct Session;
/// impl Injectable for Session {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Session)
///     }
/// }
///
/// let options = BuildOptions::new().namespace("doc-build").global(true);
/// let a = build::<Session>(options.clone())?;
/// let b = build::<Session>(options)?;
/// assert!(Arc::ptr_eq(&a, &b));
/// clear_namespace("doc-build");
/// # Ok::<(), ferrous_ioc::DiError>(())
/// ```
pub fn build<T: Injectable>(options: BuildOptions) -> DiResult<Arc<T>> {
    build_top_level::<T>(
        options.autowire,
        options.providers,
        options.namespace,
        Some(false),
        options.global,
    )
}

/// Drops every global singleton cached under `namespace` in the
/// process-wide global cache. Returns whether the namespace held anything.
pub fn clear_namespace(namespace: impl Into<Namespace>) -> bool {
    GlobalCache::process().clear_namespace(&namespace.into())
}

/// Drops every global singleton in the process-wide global cache.
pub fn clear_all_namespaces() {
    GlobalCache::process().clear_all();
}
