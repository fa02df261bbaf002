use std::sync::Mutex;

use super::lru::LruCache;
use super::view::ByteView;

/// Thread-safe shell around the LRU engine.
///
/// All operations take a single lock; the critical section is pure in-memory
/// work, so holding a `std::sync` mutex under tokio is fine. The engine
/// itself is built lazily on the first `add`, so a declared group that is
/// never written holds no cache memory at all.
pub struct ConcurrentCache {
    cache_bytes: u64,
    inner: Mutex<Option<LruCache<ByteView>>>,
}

impl ConcurrentCache {
    pub fn new(cache_bytes: u64) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(None),
        }
    }

    /// Admits `view` under `key`, constructing the engine on first use.
    pub fn add(&self, key: &str, view: ByteView) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner
            .get_or_insert_with(|| LruCache::new(self.cache_bytes, None))
            .add(key, view);
    }

    /// Looks up `key`. A miss on a never-written group does not construct
    /// the engine.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.as_mut()?.get(key).cloned()
    }

    /// Number of resident entries; 0 before the first `add`.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("cache lock poisoned");
        inner.as_ref().map(LruCache::len).unwrap_or(0)
    }

    /// Current byte usage; 0 before the first `add`.
    pub fn used_bytes(&self) -> u64 {
        let inner = self.inner.lock().expect("cache lock poisoned");
        inner.as_ref().map(LruCache::used_bytes).unwrap_or(0)
    }
}
