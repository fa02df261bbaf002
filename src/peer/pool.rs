use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{extract::Extension, Router};

use super::client::HttpPeerClient;
use super::{PeerClient, PeerPicker};
use crate::routing::HashRing;

/// URL prefix peers address each other under.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";
/// Virtual nodes per peer on the routing ring.
pub const DEFAULT_REPLICAS: usize = 50;

/// One node's view of the peer fleet.
///
/// Owns the routing ring and one [`HttpPeerClient`] per peer, both rebuilt
/// by [`set_peers`](Self::set_peers). Also serves the other side of the
/// protocol: [`router`](Self::router) exposes this node's groups to its
/// peers.
pub struct HttpPeerPool {
    /// This node's own peer identity, e.g. `http://10.0.0.1:8001`.
    self_url: String,
    /// Prefix for peer traffic; begins and ends with `/`.
    base_path: String,
    http: reqwest::Client,
    state: Mutex<PoolState>,
}

struct PoolState {
    ring: HashRing,
    clients: HashMap<String, Arc<HttpPeerClient>>,
}

impl HttpPeerPool {
    pub fn new(self_url: impl Into<String>) -> Self {
        Self::with_base_path(self_url, DEFAULT_BASE_PATH)
    }

    /// A pool whose peer traffic lives under `base_path` instead of
    /// [`DEFAULT_BASE_PATH`]. The path must begin and end with `/`.
    pub fn with_base_path(self_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        assert!(
            base_path.starts_with('/') && base_path.ends_with('/'),
            "base path must begin and end with '/': {base_path:?}"
        );
        Self {
            self_url: self_url.into(),
            base_path,
            http: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS, None),
                clients: HashMap::new(),
            }),
        }
    }

    /// Replaces the pool's peer list, rebuilding the ring and the per-peer
    /// clients. Include this node's own URL so peers agree on placement.
    pub fn set_peers<S: Into<String>>(&self, peers: impl IntoIterator<Item = S>) {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut state = self.state.lock().expect("peer pool lock poisoned");
        state.ring = HashRing::new(DEFAULT_REPLICAS, None);
        state.ring.add(&peers);
        state.clients = peers
            .into_iter()
            .map(|peer| {
                let client = HttpPeerClient::new(
                    format!("{}{}", peer, self.base_path),
                    self.http.clone(),
                );
                (peer, Arc::new(client))
            })
            .collect();
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Router serving this node's side of the peer protocol. Mount at the
    /// server root; the handler checks the base path itself.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .fallback(super::handlers::handle_peer_get)
            .layer(Extension(self))
    }
}

impl PeerPicker for HttpPeerPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>> {
        let state = self.state.lock().expect("peer pool lock poisoned");
        let owner = state.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }
        tracing::debug!(server = %self.self_url, peer = %owner, key, "picked remote peer");
        let client = state.clients.get(owner).cloned()?;
        Some(client)
    }
}
