//! Shared utilities for relay integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use img_relay::{HttpServer, RelayConfig, Shutdown};
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tokio::net::TcpListener;

/// Upstream path used by every mock.
pub const UPSTREAM_PATH: &str = "/img";

/// Serve `router` on an ephemeral loopback port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

type ReceivedFile = (Option<String>, Option<String>, Bytes);

async fn file_field(multipart: &mut Multipart, name: &str) -> Option<ReceivedFile> {
    while let Some(field) = multipart.next_field().await.ok()? {
        if field.name() == Some(name) {
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let data = field.bytes().await.ok()?;
            return Some((file_name, content_type, data));
        }
    }
    None
}

/// Upstream that answers 200 with the bytes of its `file` field.
///
/// `hits` counts every request it receives. Body size is unlimited so large
/// uploads reach the handler.
pub fn echo_upstream(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            UPSTREAM_PATH,
            post(
                |State(hits): State<Arc<AtomicUsize>>, mut multipart: Multipart| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    match file_field(&mut multipart, "file").await {
                        Some((_, _, data)) => (StatusCode::OK, data),
                        None => (StatusCode::BAD_REQUEST, Bytes::new()),
                    }
                },
            ),
        )
        .layer(DefaultBodyLimit::disable())
        .with_state(hits)
}

/// Upstream that reports what it received in its `field` part as JSON.
pub fn inspecting_upstream(field: &'static str) -> Router {
    Router::new().route(
        UPSTREAM_PATH,
        post(move |mut multipart: Multipart| async move {
            match file_field(&mut multipart, field).await {
                Some((file_name, content_type, data)) => (
                    StatusCode::OK,
                    Json(json!({
                        "file_name": file_name,
                        "content_type": content_type,
                        "len": data.len(),
                    })),
                ),
                None => (StatusCode::BAD_REQUEST, Json(json!({}))),
            }
        }),
    )
}

/// Upstream that always answers `status` with `body`.
pub fn fixed_upstream(status: StatusCode, body: &'static [u8]) -> Router {
    Router::new().route(UPSTREAM_PATH, post(move || async move { (status, body) }))
}

/// Upstream that waits `delay` before answering 200.
pub fn slow_upstream(delay: Duration) -> Router {
    Router::new().route(
        UPSTREAM_PATH,
        post(move || async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, &b"too late"[..])
        }),
    )
}

/// Accept connections and drop them without writing a byte.
pub async fn start_resetting_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => drop(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// A loopback address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Relay config pointed at a mock upstream.
pub fn relay_config(upstream: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.url = format!("http://{upstream}{UPSTREAM_PATH}");
    config.upstream.use_system_proxy = false;
    config.upstream.connect_timeout_secs = 2;
    config.upstream.request_timeout_secs = 5;
    config
}

/// Start a relay and return its address with the handle that stops it.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Multipart form with one `file` field.
pub fn upload_form(data: Vec<u8>, file_name: &'static str, mime: &str) -> Form {
    let part = Part::bytes(data).file_name(file_name).mime_str(mime).unwrap();
    Form::new().part("file", part)
}

pub fn relay_url(addr: SocketAddr) -> String {
    format!("http://{addr}/proxy/img")
}
