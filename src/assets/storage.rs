use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;

// Internal data structure, protected by a lock.
pub struct StorageInner<H: Key, T> {
    pub map: SlotMap<H, Arc<T>>,
    pub lookup: FxHashMap<String, H>,
}

impl<H: Key, T> Default for StorageInner<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::default(),
            lookup: FxHashMap::default(),
        }
    }
}

/// Thread-safe, URL-deduplicated asset container.
///
/// Entries are frozen behind `Arc` on insertion and never replaced, so every
/// lookup of a URL yields the same allocation.
pub struct AssetStorage<H: Key, T> {
    inner: RwLock<StorageInner<H, T>>,
}

impl<H: Key, T> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::default(),
        }
    }

    /// [Write] Inserts `asset` under `url` unless the URL is already present.
    ///
    /// Returns the stored entry and whether this call inserted it. When two
    /// loads race, the loser's asset is dropped and the winner's is returned.
    pub fn insert_with_key(&self, url: &str, asset: T) -> (H, Arc<T>, bool) {
        let mut guard = self.inner.write();
        if let Some(&handle) = guard.lookup.get(url)
            && let Some(existing) = guard.map.get(handle)
        {
            return (handle, Arc::clone(existing), false);
        }
        let shared = Arc::new(asset);
        let handle = guard.map.insert(Arc::clone(&shared));
        guard.lookup.insert(url.to_string(), handle);
        (handle, shared, true)
    }

    /// [Read] Gets a single resource.
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    pub fn get_by_key(&self, url: &str) -> Option<Arc<T>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(url)?;
        guard.map.get(*handle).cloned()
    }

    pub fn handle_of(&self, url: &str) -> Option<H> {
        let guard = self.inner.read();
        guard.lookup.get(url).copied()
    }

    pub fn contains_key(&self, url: &str) -> bool {
        self.inner.read().lookup.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [Read - Advanced] Acquires a read-lock guard for batch access.
    pub fn read_lock(&self) -> RwLockReadGuard<'_, StorageInner<H, T>> {
        self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    slotmap::new_key_type! {
        struct TestHandle;
    }

    #[test]
    fn first_insert_wins() {
        let storage: AssetStorage<TestHandle, u32> = AssetStorage::new();
        let (h1, a, inserted_a) = storage.insert_with_key("a.glb", 1);
        let (h2, b, inserted_b) = storage.insert_with_key("a.glb", 2);

        assert!(inserted_a);
        assert!(!inserted_b);
        assert_eq!(h1, h2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 1);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn lookup_by_url() {
        let storage: AssetStorage<TestHandle, &str> = AssetStorage::new();
        assert!(storage.get_by_key("x").is_none());
        let (handle, _, _) = storage.insert_with_key("x", "payload");
        assert_eq!(storage.handle_of("x"), Some(handle));
        assert_eq!(storage.get(handle).as_deref(), Some(&"payload"));
        assert!(storage.contains_key("x"));
    }
}
