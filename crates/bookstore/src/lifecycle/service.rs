//! Starting one service from its [`Settings`].

use crate::book_service;
use crate::clients::{BookClient, OrderClient, UserClient};
use crate::config::{ConfigError, ServiceKind, Settings};
use crate::order_service::{self, OrderContext};
use crate::payment_service::{self, PaymentContext};
use crate::review_service::{self, ReviewContext};
use crate::user_service;
use axum::Router;
use service_framework::{db, FrameworkError, ServiceServer};
use sqlx::SqlitePool;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

/// Errors that stop a service from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database setup failed for {service}: {source}")]
    Database {
        service: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Peer client setup failed: {0}")]
    PeerClient(#[from] FrameworkError),

    #[error("Could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// DDL for the tables `kind` owns.
pub fn schema(kind: ServiceKind) -> &'static [&'static str] {
    match kind {
        ServiceKind::Users => user_service::SCHEMA,
        ServiceKind::Books => book_service::SCHEMA,
        ServiceKind::Orders => order_service::SCHEMA,
        ServiceKind::Payments => payment_service::SCHEMA,
        ServiceKind::Reviews => review_service::SCHEMA,
    }
}

/// Builds the fully-stated router for `settings.kind`, wiring in the peer clients it needs.
pub fn build_router(settings: &Settings, pool: SqlitePool) -> Result<Router, StartupError> {
    let peers = &settings.peers;
    let timeout = settings.peer_timeout;
    let router = match settings.kind {
        ServiceKind::Users => user_service::router(pool),
        ServiceKind::Books => book_service::router(pool),
        ServiceKind::Orders => order_service::router(OrderContext {
            pool,
            users: UserClient::connect(&peers.users, timeout)?,
            books: BookClient::connect(&peers.books, timeout)?,
        }),
        ServiceKind::Payments => payment_service::router(PaymentContext {
            pool,
            orders: OrderClient::connect(&peers.orders, timeout)?,
        }),
        ServiceKind::Reviews => review_service::router(ReviewContext {
            pool,
            books: BookClient::connect(&peers.books, timeout)?,
            users: UserClient::connect(&peers.users, timeout)?,
        }),
    };
    Ok(router)
}

/// Opens the database, creates the tables, and starts serving.
pub async fn start_service(settings: &Settings) -> Result<ServiceServer, StartupError> {
    let service = settings.kind.service_name();
    let database = |source| StartupError::Database { service, source };

    let pool = db::connect(&settings.database_url).await.map_err(database)?;
    db::apply_schema(&pool, schema(settings.kind))
        .await
        .map_err(database)?;

    let router = build_router(settings, pool)?;
    let server = ServiceServer::spawn(service, router, settings.bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: settings.bind_addr,
            source,
        })?;
    info!(service, url = %server.base_url(), "Service started");
    Ok(server)
}
