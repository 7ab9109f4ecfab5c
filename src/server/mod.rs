//! HTTP server
//!
//! Terminates inbound HTTP and routes requests to the relay. Each connection
//! is served on its own task; the only shared state is the read-only
//! configuration.

mod cors;
mod handlers;

pub use cors::{apply_cors_headers, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
pub use handlers::{HealthResponse, SERVICE_NAME};

use crate::config::RelayConfig;
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Path accepting messages to forward
pub const RELAY_PATH: &str = "/cot";

/// Build the relay router
pub fn build_router(config: Arc<RelayConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::health_check).fallback(handlers::not_found))
        .route(
            RELAY_PATH,
            post(handlers::relay_cot).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors::cors))
        .with_state(config)
}

/// Relay HTTP server bound to its listen address
pub struct RelayServer {
    /// Relay configuration
    config: Arc<RelayConfig>,
    /// Bound listener
    listener: TcpListener,
}

impl RelayServer {
    /// Bind the listener described by `config`
    pub async fn bind(config: RelayConfig) -> Result<Self> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
        Ok(Self::from_listener(config, listener))
    }

    /// Serve on an already bound listener
    pub fn from_listener(config: RelayConfig, listener: TcpListener) -> Self {
        RelayServer {
            config: Arc::new(config),
            listener,
        }
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .with_context(|| "Failed to read listener address")
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Serve until a shutdown signal arrives
    ///
    /// Stops accepting on shutdown and returns once in-flight responses
    /// have been written.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
        let addr = self.local_addr()?;
        info!("HTTP server listening on {}", addr);
        info!("Endpoint: http://{}{}", addr, RELAY_PATH);

        let router = build_router(self.config);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Shutdown signal received, stopping server");
            })
            .await
            .with_context(|| "HTTP server error")?;

        info!("Server stopped");
        Ok(())
    }
}

/// Bind and run the relay until shutdown
pub async fn run_server(config: RelayConfig, shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
    RelayServer::bind(config).await?.run(shutdown_rx).await
}
