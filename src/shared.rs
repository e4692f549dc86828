//! Reader/writer-locked wrapper for sharing a trie across threads.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::RadixTrie;

/// A [`RadixTrie`] behind a reader/writer lock.
///
/// Mutations take the write lock, so at most one is in flight; loads and key
/// scans share the read lock. Use [`read`](Self::read) or
/// [`write`](Self::write) to run several operations under one guard.
///
/// ```
/// use radix_rs::SharedTrie;
///
/// let routes = SharedTrie::new();
/// routes.store(b"/api/users", 1u32);
/// routes.store(b"/api/posts", 2u32);
///
/// assert_eq!(routes.load(b"/api/users"), Some(1));
/// assert_eq!(routes.keys(b"/api/", 0).len(), 2);
/// ```
pub struct SharedTrie<V> {
    inner: RwLock<RadixTrie<V>>,
}

impl<V> SharedTrie<V> {
    pub fn new() -> Self {
        Self::from_trie(RadixTrie::new())
    }

    pub fn from_trie(trie: RadixTrie<V>) -> Self {
        Self {
            inner: RwLock::new(trie),
        }
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn store(&self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        self.inner.write().store(key.as_ref(), value)
    }

    pub fn delete(&self, key: impl AsRef<[u8]>) {
        self.inner.write().delete(key.as_ref());
    }

    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<V> {
        self.inner.write().remove(key.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().contains_key(key.as_ref())
    }

    /// See [`RadixTrie::keys`].
    pub fn keys(&self, prefix: impl AsRef<[u8]>, limit: usize) -> Vec<Vec<u8>> {
        self.inner.read().keys(prefix.as_ref(), limit)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RadixTrie<V>> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, RadixTrie<V>> {
        self.inner.write()
    }

    pub fn into_inner(self) -> RadixTrie<V> {
        self.inner.into_inner()
    }
}

impl<V: Clone> SharedTrie<V> {
    /// Returns a copy of the value stored for `key`.
    pub fn load(&self, key: impl AsRef<[u8]>) -> Option<V> {
        self.inner.read().load(key.as_ref()).cloned()
    }
}

impl<V> Default for SharedTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<RadixTrie<V>> for SharedTrie<V> {
    fn from(trie: RadixTrie<V>) -> Self {
        Self::from_trie(trie)
    }
}
