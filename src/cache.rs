//! Instance caches: the local/shared cache and the global namespace cache.
//!
//! Both are cheap-to-clone handles over lock-guarded maps. Locks are held
//! only for the lookup or the write itself, never while a constructor or
//! factory runs, so a probe followed by a write is not atomic: two threads
//! building the same singleton at once may both construct it, and the later
//! write wins.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::class::Class;
use crate::internal::{FastMap, Lock};
use crate::namespace::Namespace;
use crate::AnyArc;

type InstanceMap = FastMap<TypeId, AnyArc>;

static PROCESS_GLOBALS: Lazy<GlobalCache> = Lazy::new(GlobalCache::new);

/// Local/shared singleton cache keyed by class.
///
/// Each top-level build gets a fresh one unless the caller supplies one to
/// reuse. Clones share the same underlying store, which is how a
/// [`Container`](crate::Container) with a shared cache makes repeated builds
/// observe each other's singletons.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::InstanceCache;
/// use std::any::TypeId;
/// use std::sync::Arc;
///
/// let cache = InstanceCache::new();
/// let view = cache.clone();
/// cache.insert(TypeId::of::<u8>(), Arc::new(1u8));
/// assert!(view.contains(TypeId::of::<u8>()));
/// assert!(view.shares_store_with(&cache));
/// assert!(!InstanceCache::new().shares_store_with(&cache));
/// ```
#[derive(Clone, Default)]
pub struct InstanceCache {
    inner: Arc<Lock<InstanceMap>>,
}

impl InstanceCache {
    /// Empty cache with its own store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance for the class with `id`.
    #[inline]
    pub fn get(&self, id: TypeId) -> Option<AnyArc> {
        self.inner.read(|map| map.get(&id).cloned())
    }

    /// Cached instance for `class`.
    pub fn get_class(&self, class: &Class) -> Option<AnyArc> {
        self.get(class.id())
    }

    /// Cached instance of `T`, downcast.
    pub fn get_typed<T: std::any::Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get(TypeId::of::<T>()).and_then(|any| any.downcast::<T>().ok())
    }

    /// Stores `instance` for the class with `id`, replacing any previous one.
    pub fn insert(&self, id: TypeId, instance: AnyArc) {
        self.inner.write(|map| {
            map.insert(id, instance);
        });
    }

    /// Whether an instance is cached for `id`.
    pub fn contains(&self, id: TypeId) -> bool {
        self.inner.read(|map| map.contains_key(&id))
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.inner.read(|map| map.len())
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached instance. Already returned instances stay valid.
    pub fn clear(&self) {
        self.inner.write(|map| map.clear());
    }

    /// Whether both handles point at the same store.
    pub fn shares_store_with(&self, other: &InstanceCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for InstanceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCache").field("len", &self.len()).finish()
    }
}

/// Global singleton cache partitioned by [`Namespace`].
///
/// One process-wide instance backs the free functions and containers that
/// are not given their own; [`GlobalCache::new`] creates an isolated store
/// for callers that prefer to thread the cache explicitly.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{GlobalCache, Namespace};
/// use std::any::TypeId;
/// use std::sync::Arc;
///
/// let globals = GlobalCache::new();
/// let ns = Namespace::from("tenant-a");
/// globals.insert(&ns, TypeId::of::<u8>(), Arc::new(1u8));
/// assert!(globals.contains(&ns, TypeId::of::<u8>()));
/// assert!(!globals.contains(&Namespace::Default, TypeId::of::<u8>()));
///
/// assert!(globals.clear_namespace(&ns));
/// assert_eq!(globals.namespace_len(&ns), 0);
/// ```
#[derive(Clone, Default)]
pub struct GlobalCache {
    inner: Arc<Lock<FastMap<Namespace, InstanceMap>>>,
}

impl GlobalCache {
    /// Isolated, empty global cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide global cache.
    pub fn process() -> Self {
        PROCESS_GLOBALS.clone()
    }

    /// Cached instance for the class with `id` in `namespace`.
    #[inline]
    pub fn get(&self, namespace: &Namespace, id: TypeId) -> Option<AnyArc> {
        self.inner
            .read(|spaces| spaces.get(namespace).and_then(|map| map.get(&id).cloned()))
    }

    /// Stores `instance` under `namespace`, creating the namespace if absent.
    pub fn insert(&self, namespace: &Namespace, id: TypeId, instance: AnyArc) {
        self.inner.write(|spaces| {
            spaces.entry(namespace.clone()).or_default().insert(id, instance);
        });
    }

    /// Whether `namespace` holds an instance for `id`.
    pub fn contains(&self, namespace: &Namespace, id: TypeId) -> bool {
        self.inner
            .read(|spaces| spaces.get(namespace).is_some_and(|map| map.contains_key(&id)))
    }

    /// Number of instances cached under `namespace`.
    pub fn namespace_len(&self, namespace: &Namespace) -> usize {
        self.inner.read(|spaces| spaces.get(namespace).map_or(0, |map| map.len()))
    }

    /// Namespaces that currently hold entries.
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.inner.read(|spaces| spaces.keys().cloned().collect())
    }

    /// True when no namespace holds anything.
    pub fn is_empty(&self) -> bool {
        self.inner.read(|spaces| spaces.values().all(|map| map.is_empty()))
    }

    /// Removes `namespace` entirely. Returns whether it existed.
    pub fn clear_namespace(&self, namespace: &Namespace) -> bool {
        self.inner.write(|spaces| spaces.remove(namespace).is_some())
    }

    /// Removes every namespace.
    pub fn clear_all(&self) {
        self.inner.write(|spaces| spaces.clear());
    }

    /// Whether both handles point at the same store.
    pub fn shares_store_with(&self, other: &GlobalCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for GlobalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalCache")
            .field("namespaces", &self.inner.read(|spaces| spaces.len()))
            .finish()
    }
}
