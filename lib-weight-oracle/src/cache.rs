//! Bounded LRU caches for the two query shapes.
//!
//! Entries are never invalidated: the daemon's contract is that the weight
//! for a given key is immutable, because `balance_round` names a historical
//! round. `Get` mutates LRU order, so a plain mutex (not a reader/writer
//! lock) is the correct synchronization primitive (spec §4.1, §9).

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::ids::{Address, SelectionId};

pub const WEIGHT_CACHE_CAPACITY: usize = 10_000;
pub const TOTAL_WEIGHT_CACHE_CAPACITY: usize = 1_000;

pub type WeightKey = (u64, Address, SelectionId);
pub type TotalWeightKey = (u64, u64);

#[derive(Clone)]
pub struct WeightCache {
    inner: Arc<Mutex<LruCache<WeightKey, u64>>>,
}

impl WeightCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(WEIGHT_CACHE_CAPACITY).expect("nonzero capacity"),
            ))),
        }
    }

    pub fn get(&self, key: &WeightKey) -> Option<u64> {
        self.inner.lock().get(key).copied()
    }

    pub fn put(&self, key: WeightKey, value: u64) {
        self.inner.lock().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

impl Default for WeightCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct TotalWeightCache {
    inner: Arc<Mutex<LruCache<TotalWeightKey, u64>>>,
}

impl TotalWeightCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(TOTAL_WEIGHT_CACHE_CAPACITY).expect("nonzero capacity"),
            ))),
        }
    }

    pub fn get(&self, key: &TotalWeightKey) -> Option<u64> {
        self.inner.lock().get(key).copied()
    }

    pub fn put(&self, key: TotalWeightKey, value: u64) {
        self.inner.lock().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

impl Default for TotalWeightCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_cache_key_uses_all_three_components() {
        let cache = WeightCache::new();
        let addr = Address([1u8; 32]);
        let sel = SelectionId([2u8; 32]);
        cache.put((100, addr, sel), 42);

        assert_eq!(cache.get(&(100, addr, sel)), Some(42));
        assert_eq!(cache.get(&(101, addr, sel)), None);
        assert_eq!(cache.get(&(100, Address([3u8; 32]), sel)), None);
        assert_eq!(cache.get(&(100, addr, SelectionId([4u8; 32]))), None);
    }
}
