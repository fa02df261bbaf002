use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Extension, Path};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use geecache::config::Config;
use geecache::error::CacheError;
use geecache::group::{loader_fn, new_group, Group};
use geecache::peer::HttpPeerPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --self <url> [--peers <url,url,...>] [--api <addr:port>]",
            args[0]
        );
        eprintln!("Example: {} --self http://127.0.0.1:8001", args[0]);
        eprintln!(
            "Example: {} --self http://127.0.0.1:8001 \
             --peers http://127.0.0.1:8001,http://127.0.0.1:8002 --api 127.0.0.1:9999",
            args[0]
        );
        std::process::exit(1);
    }

    let mut self_url: Option<String> = None;
    let mut peers: Vec<String> = vec![];
    let mut api_addr: Option<SocketAddr> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--self" => {
                self_url = Some(args[i + 1].trim_end_matches('/').to_string());
                i += 2;
            }
            "--peers" => {
                peers.extend(args[i + 1].split(',').map(|p| {
                    p.trim_end_matches('/').to_string()
                }));
                i += 2;
            }
            "--api" => {
                api_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let self_url = self_url.context("--self is required")?;
    if peers.is_empty() {
        peers.push(self_url.clone());
    }

    let config = Config::from_env();
    tracing::info!("Starting cache node {} ({} peers)", self_url, peers.len());

    let group = new_group("scores", config.cache_bytes, scores_loader());

    let pool = Arc::new(HttpPeerPool::new(self_url.clone()));
    pool.set_peers(peers);
    group.register_peers(pool.clone());

    if let Some(api_addr) = api_addr {
        let api = Router::new()
            .route("/api/:key", get(handle_api_get))
            .route("/status", get(handle_status))
            .layer(Extension(group.clone()))
            .layer(Extension(self_url.clone()));

        tracing::info!("API server listening on {}", api_addr);
        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("API server failed: {}", e);
            }
        });
    }

    let peer_addr = bind_addr_of(&self_url)?;
    tracing::info!("Peer server listening on {}", peer_addr);

    let listener = tokio::net::TcpListener::bind(peer_addr).await?;
    axum::serve(listener, pool.router()).await?;

    Ok(())
}

/// Demo source of truth: a slow in-process table.
fn scores_loader() -> Arc<dyn geecache::Loader> {
    loader_fn(|key: String| async move {
        tracing::info!(key, "searching source table");
        match key.as_str() {
            "ana" => Ok(b"512".to_vec()),
            "boris" => Ok(b"771".to_vec()),
            "chloe" => Ok(b"264".to_vec()),
            _ => Err(anyhow::anyhow!("{key} does not exist")),
        }
    })
}

/// `http://host:port` -> `host:port` for binding the peer listener.
fn bind_addr_of(url: &str) -> anyhow::Result<SocketAddr> {
    let authority = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    authority
        .parse()
        .with_context(|| format!("cannot derive a bind address from {url:?}"))
}

async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Path(key): Path<String>,
) -> Response {
    match group.get(&key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.bytes(),
        )
            .into_response(),
        Err(e @ CacheError::KeyRequired) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Serialize)]
struct GroupStatus {
    name: String,
    entries: usize,
    used_bytes: u64,
}

#[derive(Serialize)]
struct StatusResponse {
    self_url: String,
    groups: Vec<GroupStatus>,
}

async fn handle_status(
    Extension(group): Extension<Arc<Group>>,
    Extension(self_url): Extension<String>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        self_url,
        groups: vec![GroupStatus {
            name: group.name().to_string(),
            entries: group.cache_len(),
            used_bytes: group.cache_used_bytes(),
        }],
    })
}
