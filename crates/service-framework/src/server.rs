//! # Service Server
//!
//! Binds a listener, serves a fully-stated router with request tracing and the
//! `/health` endpoint, and keeps the handle needed for graceful shutdown.

use crate::health::health_routes;
use axum::Router;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// A running HTTP service.
///
/// Dropping the handle leaves the server running; call [`ServiceServer::shutdown`]
/// to stop it and wait for in-flight requests.
pub struct ServiceServer {
    name: &'static str,
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<()>>,
}

impl ServiceServer {
    /// Binds `bind_addr` (port 0 picks a free port) and starts serving `router`.
    pub async fn spawn(
        name: &'static str,
        router: Router,
        bind_addr: SocketAddr,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        let addr = listener.local_addr()?;
        let app = router
            .merge(health_routes(name))
            .layer(TraceLayer::new_for_http());

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await
        });

        info!(service = name, %addr, "Service listening");
        Ok(Self {
            name,
            addr,
            shutdown,
            handle,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://{addr}`, suitable as a peer base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting connections and waits for the server task.
    pub async fn shutdown(self) -> io::Result<()> {
        let Self {
            name,
            shutdown,
            handle,
            ..
        } = self;
        info!(service = name, "Shutting down");
        let _ = shutdown.send(());
        join_handle(name, handle).await
    }

    /// Waits for the server task without signalling it.
    pub async fn join(self) -> io::Result<()> {
        join_handle(self.name, self.handle).await
    }
}

async fn join_handle(name: &'static str, handle: JoinHandle<io::Result<()>>) -> io::Result<()> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!(service = name, error = ?e, "Server task failed");
            Err(io::Error::other(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn test_shutdown_stops_serving() {
        let server = ServiceServer::spawn(
            "inventory-service",
            Router::new(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        )
        .await
        .unwrap();
        assert_eq!(server.name(), "inventory-service");
        let url = format!("{}/health", server.base_url());

        let health = reqwest::get(&url).await.unwrap();
        assert_eq!(health.status(), 200);

        server.shutdown().await.unwrap();
        assert!(reqwest::get(&url).await.is_err());
    }
}
