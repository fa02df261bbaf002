//! Group Coordination
//!
//! A group is a named cache namespace: its own byte budget, its own
//! source-of-truth loader, and an optional view of the peer fleet. The
//! coordinator multiplexes every read over three sources behind one call:
//!
//! - **Local**: the group's own cache shell.
//! - **Remote**: the peer the routing ring names as the key's owner.
//! - **Loader**: the external source of truth, as the last resort. This is
//!   the only branch whose result is admitted to the local cache; remote
//!   hits are served through without caching, since the owning peer already
//!   caches them.
//!
//! Groups are registered process-wide and live for the process lifetime.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock, OnceLock, RwLock};

use crate::error::CacheError;
use crate::peer::PeerPicker;
use crate::store::{ByteView, ConcurrentCache};


pub type LoadFuture = Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send>>;

/// Source-of-truth callback: retrieves the authoritative bytes for a key on
/// a cache miss.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> LoadFuture;
}

/// Adapts an async closure into a [`Loader`].
pub fn loader_fn<F, Fut>(f: F) -> Arc<dyn Loader>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    struct FnLoader<F>(F);

    impl<F, Fut> Loader for FnLoader<F>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        fn load(&self, key: &str) -> LoadFuture {
            Box::pin((self.0)(key.to_string()))
        }
    }

    Arc::new(FnLoader(f))
}

/// Process-wide group registry. Held only across map mutation or lookup,
/// never across loader or peer calls.
static GROUPS: LazyLock<RwLock<HashMap<String, Arc<Group>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Creates a group and installs it in the process-wide registry.
///
/// Registering a name twice replaces the previous group; callers own the
/// uniqueness of their names.
pub fn new_group(name: &str, cache_bytes: u64, loader: Arc<dyn Loader>) -> Arc<Group> {
    let group = Arc::new(Group {
        name: name.to_string(),
        loader,
        main_cache: ConcurrentCache::new(cache_bytes),
        peers: OnceLock::new(),
    });

    let mut groups = GROUPS.write().expect("group registry lock poisoned");
    groups.insert(name.to_string(), group.clone());
    group
}

/// Looks up a previously registered group.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    let groups = GROUPS.read().expect("group registry lock poisoned");
    groups.get(name).cloned()
}

/// A cache namespace and the machinery to fill it.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    main_cache: ConcurrentCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer picker. Peer topology is wired once at startup;
    /// calling this twice on one group is a bug and panics.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once on group {:?}", self.name);
        }
    }

    /// Looks up `key`, consulting the local cache, then the owning peer,
    /// then the loader.
    pub async fn get(&self, key: &str) -> Result<ByteView, CacheError> {
        if key.is_empty() {
            return Err(CacheError::KeyRequired);
        }

        if let Some(view) = self.main_cache.get(key) {
            tracing::debug!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView, CacheError> {
        if let Some(picker) = self.peers.get() {
            if let Some(peer) = picker.pick_peer(key) {
                match peer.fetch(&self.name, key).await {
                    // Served straight through; the owning peer caches it.
                    Ok(bytes) => return Ok(ByteView::from(bytes)),
                    Err(e) => {
                        tracing::warn!(
                            group = %self.name, key, error = %e,
                            "peer fetch failed, falling back to local load"
                        );
                    }
                }
            }
        }

        self.load_locally(key).await
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView, CacheError> {
        let bytes = self
            .loader
            .load(key)
            .await
            .map_err(|source| CacheError::Loader {
                key: key.to_string(),
                source,
            })?;

        let view = ByteView::from(bytes);
        self.populate_cache(key, view.clone());
        Ok(view)
    }

    fn populate_cache(&self, key: &str, view: ByteView) {
        self.main_cache.add(key, view);
    }

    /// Entries resident in this group's cache.
    pub fn cache_len(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes resident in this group's cache.
    pub fn cache_used_bytes(&self) -> u64 {
        self.main_cache.used_bytes()
    }
}
