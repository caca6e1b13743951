//! All five services in one process.

use super::service::{start_service, StartupError};
use crate::config::{PeerUrls, ServiceKind, Settings};
use service_framework::ServiceServer;
use std::io;
use tracing::{error, info};

/// The five services, running side by side and talking over real HTTP.
pub struct BookstoreSystem {
    users: ServiceServer,
    books: ServiceServer,
    orders: ServiceServer,
    payments: ServiceServer,
    reviews: ServiceServer,
}

impl BookstoreSystem {
    /// Starts every service on an ephemeral localhost port with its own in-memory
    /// database, each wired to the others' actual addresses.
    pub async fn start_in_memory() -> Result<Self, StartupError> {
        let users = start_service(&Settings::in_memory(ServiceKind::Users, PeerUrls::default())).await?;
        let books = start_service(&Settings::in_memory(ServiceKind::Books, PeerUrls::default())).await?;

        let mut peers = PeerUrls {
            users: users.base_url(),
            books: books.base_url(),
            ..PeerUrls::default()
        };
        let orders = start_service(&Settings::in_memory(ServiceKind::Orders, peers.clone())).await?;
        peers.orders = orders.base_url();

        let payments = start_service(&Settings::in_memory(ServiceKind::Payments, peers.clone())).await?;
        let reviews = start_service(&Settings::in_memory(ServiceKind::Reviews, peers)).await?;

        info!("Bookstore system started in memory");
        Ok(Self {
            users,
            books,
            orders,
            payments,
            reviews,
        })
    }

    /// Starts every service on its default port and database, with peer URLs and
    /// timeouts read from the environment.
    pub async fn start_from_env() -> Result<Self, StartupError> {
        let settings = |kind| Settings::shared_from_env(kind).map_err(StartupError::from);
        Ok(Self {
            users: start_service(&settings(ServiceKind::Users)?).await?,
            books: start_service(&settings(ServiceKind::Books)?).await?,
            orders: start_service(&settings(ServiceKind::Orders)?).await?,
            payments: start_service(&settings(ServiceKind::Payments)?).await?,
            reviews: start_service(&settings(ServiceKind::Reviews)?).await?,
        })
    }

    fn server(&self, kind: ServiceKind) -> &ServiceServer {
        match kind {
            ServiceKind::Users => &self.users,
            ServiceKind::Books => &self.books,
            ServiceKind::Orders => &self.orders,
            ServiceKind::Payments => &self.payments,
            ServiceKind::Reviews => &self.reviews,
        }
    }

    /// `http://{addr}` of one service.
    pub fn base_url(&self, kind: ServiceKind) -> String {
        self.server(kind).base_url()
    }

    /// Stops the services, dependents first, and waits for in-flight requests.
    pub async fn shutdown(self) -> io::Result<()> {
        info!("Shutting down bookstore system");
        let mut first_error = None;
        for server in [self.reviews, self.payments, self.orders, self.books, self.users] {
            let name = server.name();
            if let Err(e) = server.shutdown().await {
                error!(service = name, error = %e, "Shutdown failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
