//! Diagnostic observers for build traceability.
//!
//! Observers are notified synchronously as the resolver walks the instance
//! graph: when a class starts building, when a cache answers instead, when a
//! build completes, and when one is aborted. They are attached to a
//! [`Container`](crate::Container) and inherited by the child containers
//! handed to factories.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::class::Class;
use crate::error::DiError;
use crate::namespace::Namespace;

/// Which cache answered a build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    /// The local/shared cache of the current build
    Local,
    /// The global cache of the current namespace
    Global,
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTier::Local => f.write_str("local"),
            CacheTier::Global => f.write_str("global"),
        }
    }
}

/// Observer trait for build events.
///
/// Calls happen on the building thread, inside the recursion. Keep
/// implementations cheap.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{BuildObserver, CacheTier, Class, Container, ContainerOptions, DiError, Namespace};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<&'static str>>,
/// }
///
/// impl BuildObserver for Recorder {
///     fn building(&self, _class: &Class, _namespace: &Namespace) {}
///     fn built(&self, class: &Class, _duration: Duration) {
///         self.built.lock().unwrap().push(class.name());
///     }
///     fn cache_hit(&self, _class: &Class, _tier: CacheTier) {}
///     fn failed(&self, _class: &Class, _error: &DiError) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new(ContainerOptions::new().observer(recorder.clone()));
/// # let _ = container;
/// ```
pub trait BuildObserver: Send + Sync {
    /// A class is about to be built (after both cache probes missed).
    fn building(&self, class: &Class, namespace: &Namespace);

    /// A class finished building, including property injection and cache writes.
    fn built(&self, class: &Class, duration: Duration);

    /// A cache returned an existing instance; no build happened.
    fn cache_hit(&self, class: &Class, tier: CacheTier);

    /// Building `class` was aborted. Called once per aborted frame, innermost first.
    fn failed(&self, class: &Class, error: &DiError);
}

/// Observers attached to a container.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn BuildObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn BuildObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn building(&self, class: &Class, namespace: &Namespace) {
        for observer in &self.observers {
            observer.building(class, namespace);
        }
    }

    #[inline]
    pub(crate) fn built(&self, class: &Class, duration: Duration) {
        for observer in &self.observers {
            observer.built(class, duration);
        }
    }

    #[inline]
    pub(crate) fn cache_hit(&self, class: &Class, tier: CacheTier) {
        for observer in &self.observers {
            observer.cache_hit(class, tier);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, class: &Class, error: &DiError) {
        for observer in &self.observers {
            observer.failed(class, error);
        }
    }
}

/// Built-in observer that logs events to stdout.
///
/// Useful during development. For production, implement [`BuildObserver`]
/// on top of your logging stack, or enable the `tracing` feature and use
/// `TracingObserver`.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerOptions, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new(
///     ContainerOptions::new().observer(Arc::new(LoggingObserver::with_prefix("[app]"))),
/// );
/// # let _ = container;
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Logging observer with the default `[ferrous-ioc]` prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-ioc]".to_string(),
        }
    }

    /// Logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildObserver for LoggingObserver {
    fn building(&self, class: &Class, namespace: &Namespace) {
        println!("{} Building: {} (namespace {})", self.prefix, class.name(), namespace);
    }

    fn built(&self, class: &Class, duration: Duration) {
        println!("{} Built: {} in {:?}", self.prefix, class.name(), duration);
    }

    fn cache_hit(&self, class: &Class, tier: CacheTier) {
        println!("{} Cache hit ({}): {}", self.prefix, tier, class.name());
    }

    fn failed(&self, class: &Class, error: &DiError) {
        eprintln!("{} FAILED {}: {}", self.prefix, class.name(), error);
    }
}

/// Observer that emits `tracing` events.
///
/// Builds and cache hits are `trace`/`debug` level; aborted builds are `warn`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl TracingObserver {
    /// Creates a tracing observer.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "tracing")]
impl BuildObserver for TracingObserver {
    fn building(&self, class: &Class, namespace: &Namespace) {
        tracing::trace!(class = class.name(), namespace = %namespace, "building");
    }

    fn built(&self, class: &Class, duration: Duration) {
        let elapsed_us = duration.as_micros() as u64;
        tracing::debug!(class = class.name(), elapsed_us, "built");
    }

    fn cache_hit(&self, class: &Class, tier: CacheTier) {
        tracing::trace!(class = class.name(), tier = %tier, "cache hit");
    }

    fn failed(&self, class: &Class, error: &DiError) {
        tracing::warn!(class = class.name(), error = %error, "build failed");
    }
}

/// Observer that counts events for post-run analysis.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerOptions, MetricsObserver};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let container = Container::new(ContainerOptions::new().observer(metrics.clone()));
/// # let _ = container;
/// assert_eq!(metrics.builds(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MetricsObserver {
    builds: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
    total_build_nanos: AtomicU64,
}

impl MetricsObserver {
    /// Creates a metrics observer with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed builds.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Requests answered from either cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Aborted build frames.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Sum of build durations. Nested builds are counted inside their parents too.
    pub fn total_build_time(&self) -> Duration {
        Duration::from_nanos(self.total_build_nanos.load(Ordering::Relaxed))
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.builds.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.total_build_nanos.store(0, Ordering::Relaxed);
    }
}

impl BuildObserver for MetricsObserver {
    fn building(&self, _class: &Class, _namespace: &Namespace) {}

    fn built(&self, _class: &Class, duration: Duration) {
        self.builds.fetch_add(1, Ordering::Relaxed);
        self.total_build_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn cache_hit(&self, _class: &Class, _tier: CacheTier) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn failed(&self, _class: &Class, _error: &DiError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}
