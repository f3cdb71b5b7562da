//! Shared utilities for integration tests.

use std::net::SocketAddr;

use api_gateway::lifecycle::Shutdown;
use api_gateway::{Gateway, HttpServer};
use axum::Router;
use tokio::net::TcpListener;

/// Serve `app` as a mock backend on an ephemeral port.
pub async fn start_backend(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// Serve `gateway` through the full HTTP server stack on an ephemeral port.
pub async fn start_gateway(gateway: Gateway) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(gateway);
    let server_shutdown = shutdown.subscribe();
    // the sender must outlive the server, a closed channel counts as shutdown
    let sender = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
        drop(sender);
    });

    (addr, shutdown)
}

/// A client that never reuses connections or consults proxy env vars.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
