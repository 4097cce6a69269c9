//! Lock and map aliases switched by the performance features.

use std::collections::HashMap;

#[cfg(feature = "ahash")]
pub(crate) type FastMap<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type FastMap<K, V> = HashMap<K, V>;

#[cfg(feature = "smallvec")]
pub(crate) type ArgVec<T> = smallvec::SmallVec<[T; 4]>;
#[cfg(not(feature = "smallvec"))]
pub(crate) type ArgVec<T> = Vec<T>;

/// Reader-writer lock with a poison-free API.
///
/// Cached entries are written once per key, so a panic in another thread never
/// leaves a half-written map behind and poisoning can be ignored.
#[derive(Default)]
pub(crate) struct Lock<T> {
    #[cfg(feature = "parking-lot")]
    inner: parking_lot::RwLock<T>,
    #[cfg(not(feature = "parking-lot"))]
    inner: std::sync::RwLock<T>,
}

impl<T> Lock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "parking-lot")]
            inner: parking_lot::RwLock::new(value),
            #[cfg(not(feature = "parking-lot"))]
            inner: std::sync::RwLock::new(value),
        }
    }

    /// Runs `f` with shared access.
    #[inline]
    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        #[cfg(feature = "parking-lot")]
        {
            f(&self.inner.read())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            let guard = self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            f(&guard)
        }
    }

    /// Runs `f` with exclusive access.
    #[inline]
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        #[cfg(feature = "parking-lot")]
        {
            f(&mut self.inner.write())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            let mut guard = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            f(&mut guard)
        }
    }
}
