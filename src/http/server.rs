//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the gateway router with middleware (tracing, request ID)
//! - Bind server to listener with peer address info
//! - Serve until the shutdown signal fires, then drain

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::routing::Gateway;

/// HTTP server fronting a gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server for the routes registered on `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self {
            router: Self::build_router(gateway.into_router()),
        }
    }

    /// Add the middleware stack around the dispatch router.
    fn build_router(router: Router) -> Router {
        router
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
