use axum::http::StatusCode;

use super::{FetchFuture, PeerClient};
use crate::error::PeerError;

/// HTTP client for a single remote peer.
pub struct HttpPeerClient {
    /// Peer base URL including the pool's base path, `/`-terminated,
    /// e.g. `http://10.0.0.2:8001/_geecache/`.
    base_url: String,
    http: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PeerClient for HttpPeerClient {
    fn fetch(&self, group: &str, key: &str) -> FetchFuture {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key),
        );
        let http = self.http.clone();

        Box::pin(async move {
            let response = http.get(&url).send().await.map_err(PeerError::Transport)?;
            let status = response.status();
            if status != StatusCode::OK {
                return Err(PeerError::Status(status));
            }
            response.bytes().await.map_err(PeerError::Body)
        })
    }
}
