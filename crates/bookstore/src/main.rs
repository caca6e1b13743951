//! # Bookstore
//!
//! ```bash
//! bookstore books      # one service, configured from the environment / .env
//! bookstore all        # all five in one process on their default ports
//! ```
//!
//! Stops gracefully on Ctrl-C.

use bookstore::config::{ServiceKind, Settings};
use bookstore::lifecycle::{start_service, BookstoreSystem};
use service_framework::tracing::setup_tracing;
use tracing::{error, info};

const USAGE: &str = "usage: bookstore <users|books|orders|payments|reviews|all>";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let Some(target) = std::env::args().nth(1) else {
        return Err(USAGE.to_string());
    };

    if target == "all" {
        let system = BookstoreSystem::start_from_env()
            .await
            .map_err(|e| e.to_string())?;
        info!("All services running, press Ctrl-C to stop");
        wait_for_ctrl_c().await;
        return system.shutdown().await.map_err(|e| e.to_string());
    }

    let kind: ServiceKind = target
        .parse()
        .map_err(|e| format!("{e}\n{USAGE}"))?;
    let settings = Settings::from_env(kind).map_err(|e| e.to_string())?;
    let server = start_service(&settings).await.map_err(|e| e.to_string())?;
    wait_for_ctrl_c().await;
    server.shutdown().await.map_err(|e| e.to_string())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for Ctrl-C");
    }
}
