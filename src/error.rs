//! Error types for the cache core.
//!
//! Two families with different recovery policies: [`CacheError`] surfaces to
//! callers of a group. [`PeerError`] stays internal; a failed remote fetch
//! is logged and demoted to a local load, never returned.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors a group lookup can return.
#[derive(Debug, Error)]
pub enum CacheError {
    /// `Group::get` was called with an empty key.
    #[error("key is required")]
    KeyRequired,

    /// The source-of-truth loader failed; its error is surfaced unchanged.
    #[error("loading {key:?}: {source}")]
    Loader {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Failures while fetching a key from a remote peer.
#[derive(Debug, Error)]
pub enum PeerError {
    /// The request never produced a response.
    #[error("contacting peer: {0}")]
    Transport(#[source] reqwest::Error),

    /// The peer answered with a non-OK status.
    #[error("peer returned {0}")]
    Status(StatusCode),

    /// The response body could not be read.
    #[error("reading peer response: {0}")]
    Body(#[source] reqwest::Error),
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
