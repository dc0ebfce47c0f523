//! HTTP services for the CEP weather relay.
//!
//! - `gateway`: validates the postal code and forwards it to the resolver
//! - `resolver`: resolves the postal code to a city and fetches its temperature

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub mod error;
pub mod gateway;
pub mod resolver;
pub mod telemetry;

/// Serve `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
