//! Wire-level tests for the peer protocol: a real listener on one side, a
//! real HTTP client on the other.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geecache::error::PeerError;
use geecache::group::{loader_fn, new_group};
use geecache::peer::{HttpPeerClient, HttpPeerPool, PeerClient, PeerPicker, DEFAULT_BASE_PATH};

/// Binds an ephemeral port and serves the peer protocol on it.
async fn start_peer_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    let pool = Arc::new(HttpPeerPool::new(format!("http://{addr}")));
    tokio::spawn(async move {
        axum::serve(listener, pool.router()).await.unwrap();
    });

    addr
}

/// Registers a group whose loader echoes `value-of-<key>` and counts loads.
fn echo_group(name: &str) -> Arc<AtomicUsize> {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    new_group(
        name,
        2 << 10,
        loader_fn(move |key: String| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(format!("value-of-{key}").into_bytes())
            }
        }),
    );
    loads
}

#[tokio::test]
async fn test_round_trip_through_peer_client() {
    echo_group("wire-trip");
    let addr = start_peer_server().await;

    let client = HttpPeerClient::new(
        format!("http://{addr}{DEFAULT_BASE_PATH}"),
        reqwest::Client::new(),
    );

    let body = client.fetch("wire-trip", "alpha").await.unwrap();
    assert_eq!(&body[..], b"value-of-alpha");
}

#[tokio::test]
async fn test_response_is_an_octet_stream() {
    echo_group("wire-headers");
    let addr = start_peer_server().await;

    let response = reqwest::get(format!("http://{addr}{DEFAULT_BASE_PATH}wire-headers/alpha"))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/octet-stream")
    );
    assert_eq!(&response.bytes().await.unwrap()[..], b"value-of-alpha");
}

#[tokio::test]
async fn test_keys_survive_url_escaping() {
    echo_group("wire-escape");
    let addr = start_peer_server().await;

    let client = HttpPeerClient::new(
        format!("http://{addr}{DEFAULT_BASE_PATH}"),
        reqwest::Client::new(),
    );

    let body = client.fetch("wire-escape", "a/b c").await.unwrap();
    assert_eq!(&body[..], b"value-of-a/b c");
}

#[tokio::test]
async fn test_unknown_group_is_404() {
    let addr = start_peer_server().await;

    let response = reqwest::get(format!("http://{addr}{DEFAULT_BASE_PATH}wire-missing/key"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(
        response.text().await.unwrap(),
        "no such group: wire-missing"
    );

    // The typed client reports the same condition as a status failure.
    let client = HttpPeerClient::new(
        format!("http://{addr}{DEFAULT_BASE_PATH}"),
        reqwest::Client::new(),
    );
    match client.fetch("wire-missing", "key").await {
        Err(PeerError::Status(status)) => {
            assert_eq!(status, axum::http::StatusCode::NOT_FOUND)
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_path_without_key_is_400() {
    let addr = start_peer_server().await;

    let response = reqwest::get(format!("http://{addr}{DEFAULT_BASE_PATH}only-a-group"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_loader_error_is_500_with_message() {
    new_group(
        "wire-sour",
        2 << 10,
        loader_fn(|key: String| async move {
            anyhow::bail!("{key} is not served here");
        }),
    );
    let addr = start_peer_server().await;

    let response = reqwest::get(format!("http://{addr}{DEFAULT_BASE_PATH}wire-sour/milk"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    assert!(response.text().await.unwrap().contains("milk"));
}

/// Picker that routes every key to one fixed remote client.
struct LonePeer(Arc<dyn PeerClient>);

impl PeerPicker for LonePeer {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerClient>> {
        Some(self.0.clone())
    }
}

#[tokio::test]
async fn test_unreachable_peer_falls_back_to_local_load() {
    let loads = echo_group("wire-fallback");
    let group = geecache::get_group("wire-fallback").unwrap();

    // Nothing listens here; the fetch dies in transport.
    let dead = HttpPeerClient::new(
        format!("http://127.0.0.1:1{DEFAULT_BASE_PATH}"),
        reqwest::Client::new(),
    );
    group.register_peers(Arc::new(LonePeer(Arc::new(dead))));

    let view = group.get("omega").await.unwrap();
    assert_eq!(view.as_bytes(), b"value-of-omega");
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
