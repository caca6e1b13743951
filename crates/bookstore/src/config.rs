//! # Configuration
//!
//! Each service is configured from the environment (optionally seeded from a `.env`
//! file through `dotenvy`). [`Settings`] is built once at startup and handed to the
//! service; nothing reads the environment after that.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:{PORT}` |
//! | `PORT` | 8001 users, 8002 books, 8003 orders, 8004 payments, 8005 reviews |
//! | `DATABASE_URL` | `sqlite://{service}.db` |
//! | `USERS_SERVICE_URL` | `http://localhost:8001` |
//! | `BOOKS_SERVICE_URL` | `http://localhost:8002` |
//! | `ORDERS_SERVICE_URL` | `http://localhost:8003` |
//! | `PEER_TIMEOUT_SECS` | `5` |

use service_framework::DEFAULT_PEER_TIMEOUT;
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// The five deployable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Users,
    Books,
    Orders,
    Payments,
    Reviews,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Users,
        ServiceKind::Books,
        ServiceKind::Orders,
        ServiceKind::Payments,
        ServiceKind::Reviews,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Users => "users",
            ServiceKind::Books => "books",
            ServiceKind::Orders => "orders",
            ServiceKind::Payments => "payments",
            ServiceKind::Reviews => "reviews",
        }
    }

    /// Name reported by `/health`, e.g. `books-service`.
    pub fn service_name(self) -> &'static str {
        match self {
            ServiceKind::Users => "users-service",
            ServiceKind::Books => "books-service",
            ServiceKind::Orders => "orders-service",
            ServiceKind::Payments => "payments-service",
            ServiceKind::Reviews => "reviews-service",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Users => 8001,
            ServiceKind::Books => 8002,
            ServiceKind::Orders => 8003,
            ServiceKind::Payments => 8004,
            ServiceKind::Reviews => 8005,
        }
    }

    fn default_url(self) -> String {
        format!("http://localhost:{}", self.default_port())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownService(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown service '{0}' (expected users, books, orders, payments, reviews or all)")]
    UnknownService(String),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Where peers live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerUrls {
    pub users: String,
    pub books: String,
    pub orders: String,
}

impl Default for PeerUrls {
    fn default() -> Self {
        Self {
            users: ServiceKind::Users.default_url(),
            books: ServiceKind::Books.default_url(),
            orders: ServiceKind::Orders.default_url(),
        }
    }
}

/// Immutable per-service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub kind: ServiceKind,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub peers: PeerUrls,
    pub peer_timeout: Duration,
}

impl Settings {
    /// Reads the process environment after loading `.env`, if there is one.
    pub fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_vars(kind, &std::env::vars().collect())
    }

    /// Like [`Settings::from_env`] for a process hosting every service: variables that
    /// would make the services collide (`PORT`, `BIND_ADDR`, `DATABASE_URL`) are
    /// ignored in favour of the per-service defaults.
    pub fn shared_from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        load_dotenv();
        let mut vars: HashMap<String, String> = std::env::vars().collect();
        for name in ["PORT", "BIND_ADDR", "DATABASE_URL"] {
            vars.remove(name);
        }
        Self::from_vars(kind, &vars)
    }

    /// Builds settings from an explicit variable map.
    pub fn from_vars(
        kind: ServiceKind,
        vars: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| vars.get(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => parse(raw, "PORT")?,
            None => kind.default_port(),
        };
        let bind_addr = match var("BIND_ADDR") {
            Some(raw) => parse(raw, "BIND_ADDR")?,
            None => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        };
        let peer_timeout = match var("PEER_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse(raw, "PEER_TIMEOUT_SECS")?),
            None => DEFAULT_PEER_TIMEOUT,
        };
        let defaults = PeerUrls::default();

        Ok(Self {
            kind,
            bind_addr,
            database_url: var("DATABASE_URL")
                .cloned()
                .unwrap_or_else(|| format!("sqlite://{}.db", kind.as_str())),
            peers: PeerUrls {
                users: var("USERS_SERVICE_URL").cloned().unwrap_or(defaults.users),
                books: var("BOOKS_SERVICE_URL").cloned().unwrap_or(defaults.books),
                orders: var("ORDERS_SERVICE_URL").cloned().unwrap_or(defaults.orders),
            },
            peer_timeout,
        })
    }

    /// Settings for an in-process test deployment: ephemeral port, private in-memory database.
    pub fn in_memory(kind: ServiceKind, peers: PeerUrls) -> Self {
        Self {
            kind,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            database_url: "sqlite::memory:".to_string(),
            peers,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
        }
    }
}

fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
        }
    }
}

fn parse<T: FromStr>(raw: &str, name: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_per_service() {
        let settings = Settings::from_vars(ServiceKind::Orders, &vars(&[])).unwrap();
        assert_eq!(settings.bind_addr.port(), 8003);
        assert_eq!(settings.database_url, "sqlite://orders.db");
        assert_eq!(settings.peers.users, "http://localhost:8001");
        assert_eq!(settings.peers.books, "http://localhost:8002");
        assert_eq!(settings.peer_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_vars(
            ServiceKind::Payments,
            &vars(&[
                ("PORT", "9100"),
                ("DATABASE_URL", "sqlite::memory:"),
                ("ORDERS_SERVICE_URL", "http://orders:8000"),
                ("PEER_TIMEOUT_SECS", "2"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.bind_addr.port(), 9100);
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.peers.orders, "http://orders:8000");
        assert_eq!(settings.peer_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bind_addr_wins_over_port() {
        let settings = Settings::from_vars(
            ServiceKind::Books,
            &vars(&[("PORT", "9100"), ("BIND_ADDR", "127.0.0.1:7000")]),
        )
        .unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:7000".parse().unwrap());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_vars(ServiceKind::Users, &vars(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT: http");
        assert!("inventory".parse::<ServiceKind>().is_err());
    }
}
