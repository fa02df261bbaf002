//! Peer Interfaces & HTTP Transport
//!
//! How one cache node talks to another. The group coordinator only sees the
//! two traits here: a [`PeerPicker`] that names the owner of a key, and a
//! [`PeerClient`] that fetches `(group, key)` from that owner. The HTTP
//! side ([`HttpPeerPool`], [`HttpPeerClient`], and the axum handler)
//! implements them over the wire protocol:
//!
//! `GET {base_path}{group}/{key}` → `200 application/octet-stream` raw bytes.

pub mod client;
pub mod handlers;
pub mod pool;

pub use client::HttpPeerClient;
pub use pool::{HttpPeerPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::PeerError;

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Bytes, PeerError>> + Send>>;

/// Fetches a key of a named group from one remote peer.
///
/// Idempotent; callers may retry at their own discretion (none is performed
/// here).
pub trait PeerClient: Send + Sync {
    fn fetch(&self, group: &str, key: &str) -> FetchFuture;
}

/// Chooses the peer that owns a key.
///
/// `None` means "load locally": either no peers are registered or the owner
/// is this node itself. Returning the client rather than an identity lets
/// the picker drop its lock before anyone dials.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>>;
}
