//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use access_log::config::ServerConfig;
use access_log::http::{middleware, Handler, HttpServer};
use axum::body::Bytes;
use axum::http::{Request, StatusCode};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::Layer;

/// One access log entry as seen by the reporting callback.
#[derive(Debug, Clone)]
pub struct Entry {
    pub method: String,
    pub url: String,
    pub status: Option<StatusCode>,
    pub size: u64,
    pub duration: Duration,
}

/// Start a server on an ephemeral port running `handler` behind the access
/// log middleware. Entries are delivered on the returned channel.
pub async fn start_logged_server<H>(handler: H) -> (SocketAddr, mpsc::UnboundedReceiver<Entry>)
where
    H: Handler + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let log = move |req: &Request<Bytes>, status: Option<StatusCode>, size: u64, duration: Duration| {
        let _ = tx.send(Entry {
            method: req.method().to_string(),
            url: req.uri().to_string(),
            status,
            size,
            duration,
        });
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(ServerConfig::default(), middleware(log).layer(handler)).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (addr, rx)
}

/// Wait for the next access log entry.
pub async fn next_entry(rx: &mut mpsc::UnboundedReceiver<Entry>) -> Entry {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for access log entry")
        .expect("access log channel closed")
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
