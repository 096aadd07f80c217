//! In-memory store of decoded tiles with optional LRU eviction.

use crate::coord::TileAddress;
use crate::decode::VectorTile;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Entry in the memory store.
#[derive(Debug, Clone)]
struct StoreEntry {
    tile: Arc<VectorTile>,
    /// Logical clock value of the last access
    last_accessed: u64,
    access_count: u64,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<TileAddress, StoreEntry>,
    clock: u64,
}

impl StoreInner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Holds the canonical decoded tile per address.
///
/// With a capacity, inserting past it evicts the least recently used entry.
/// Without one the store grows for as long as it lives.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Creates a store. `None` or `Some(0)` means unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            capacity: capacity.filter(|c| *c > 0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns the tile for `address`, marking it recently used.
    pub fn get(&self, address: &TileAddress) -> Option<Arc<VectorTile>> {
        let mut inner = self.inner.lock();
        let now = inner.tick();

        inner.entries.get_mut(address).map(|entry| {
            entry.last_accessed = now;
            entry.access_count += 1;
            Arc::clone(&entry.tile)
        })
    }

    /// Stores `tile` for `address`, returning how many entries were evicted.
    pub fn insert(&self, address: TileAddress, tile: Arc<VectorTile>) -> u64 {
        let mut inner = self.inner.lock();
        let now = inner.tick();

        let mut evicted = 0;
        if let Some(capacity) = self.capacity {
            while inner.entries.len() >= capacity && !inner.entries.contains_key(&address) {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_accessed)
                    .map(|(key, _)| *key);

                match oldest {
                    Some(key) => {
                        inner.entries.remove(&key);
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        inner.entries.insert(
            address,
            StoreEntry {
                tile,
                last_accessed: now,
                access_count: 0,
            },
        );
        evicted
    }

    pub fn contains(&self, address: &TileAddress) -> bool {
        self.inner.lock().entries.contains_key(address)
    }

    /// Number of times `address` was read since it was stored.
    pub fn access_count(&self, address: &TileAddress) -> Option<u64> {
        self.inner
            .lock()
            .entries
            .get(address)
            .map(|entry| entry.access_count)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Arc<VectorTile> {
        Arc::new(VectorTile::default())
    }

    fn addr(x: u32) -> TileAddress {
        TileAddress::new(x, 0, 10)
    }

    #[test]
    fn test_put_and_get() {
        let store = MemoryStore::unbounded();
        let t = tile();
        store.insert(addr(1), Arc::clone(&t));

        let got = store.get(&addr(1)).unwrap();
        assert!(Arc::ptr_eq(&got, &t));
        assert_eq!(store.len(), 1);
        assert_eq!(store.access_count(&addr(1)), Some(1));
    }

    #[test]
    fn test_miss() {
        let store = MemoryStore::unbounded();
        assert!(store.get(&addr(1)).is_none());
        assert!(!store.contains(&addr(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let store = MemoryStore::new(Some(0));
        assert_eq!(store.capacity(), None);
        for x in 0..100 {
            store.insert(addr(x), tile());
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_lru_eviction() {
        let store = MemoryStore::new(Some(2));
        store.insert(addr(1), tile());
        store.insert(addr(2), tile());

        // Touch 1 so that 2 becomes least recently used.
        store.get(&addr(1));

        let evicted = store.insert(addr(3), tile());
        assert_eq!(evicted, 1);
        assert!(store.contains(&addr(1)));
        assert!(!store.contains(&addr(2)));
        assert!(store.contains(&addr(3)));
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let store = MemoryStore::new(Some(2));
        store.insert(addr(1), tile());
        store.insert(addr(2), tile());
        assert_eq!(store.insert(addr(2), tile()), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::unbounded();
        store.insert(addr(1), tile());
        store.clear();
        assert!(store.is_empty());
    }
}
