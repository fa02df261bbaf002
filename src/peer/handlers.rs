//! Peer-facing HTTP handler.
//!
//! Serves `GET {base_path}{group}/{key}` by dispatching into the local
//! group registry. Mounted as the fallback of [`HttpPeerPool::router`] so
//! that every request on the peer port flows through here and the base
//! path check below sees the full path.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::pool::HttpPeerPool;
use crate::group;

pub async fn handle_peer_get(
    Extension(pool): Extension<Arc<HttpPeerPool>>,
    method: Method,
    uri: Uri,
) -> Response {
    let path = uri.path();
    // Reaching this handler off the base path means the server was wired
    // onto the wrong route; that is a bug, not a client error.
    let Some(rest) = path.strip_prefix(pool.base_path()) else {
        panic!("peer handler serving unexpected path: {path}");
    };
    tracing::debug!(server = %pool.self_url(), %method, path, "peer request");

    // {group}/{key}, both percent-encoded. Keys may contain '/' once
    // decoded, so split before decoding.
    let Some((group_name, key)) = rest.split_once('/') else {
        return (StatusCode::BAD_REQUEST, "bad request").into_response();
    };
    let (Ok(group_name), Ok(key)) = (urlencoding::decode(group_name), urlencoding::decode(key))
    else {
        return (StatusCode::BAD_REQUEST, "bad request").into_response();
    };

    let Some(group) = group::get_group(&group_name) else {
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {group_name}"),
        )
            .into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.bytes(),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
