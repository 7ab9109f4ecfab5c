//! cotrelay - HTTP to UDP relay for CoT messages
//!
//! This is the main entry point for the cotrelay application.

use anyhow::Result;
use clap::Parser;
use cotrelay::config::{resolve_config, ConfigOverrides, RelayConfig};
use cotrelay::server::RelayServer;
use std::net::IpAddr;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// cotrelay - forwards CoT messages received over HTTP as UDP datagrams
#[derive(Parser, Debug)]
#[command(name = "cotrelay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "COT_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address the HTTP listener binds to
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<IpAddr>,

    /// Comma-separated allowed UDP destinations (IPs and network/bits ranges)
    #[arg(long, env = "ALLOWED_UDP_HOSTS")]
    allowed_udp_hosts: Option<String>,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "JSON_LOG")]
    json_log: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_port: self.port,
            bind_addr: self.bind,
            allowed_udp_hosts: self.allowed_udp_hosts.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(&args.log_level, args.json_log)?;

    // Load configuration
    let config = resolve_config(args.config.as_deref(), args.overrides())?;

    info!("cotrelay v{}", cotrelay::VERSION);
    if let Some(path) = &args.config {
        info!("Configuration loaded from: {:?}", path);
    }
    log_security(&config);

    let server = RelayServer::bind(config).await?;

    // Setup shutdown signal
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Handle Ctrl+C and termination signals (cross-platform)
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            info!("Received Ctrl+C, shutting down...");
                        }
                        _ = sigterm.recv() => {
                            info!("Received SIGTERM, shutting down...");
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to setup SIGTERM handler: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                    info!("Received Ctrl+C, shutting down...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            // On Windows, only handle Ctrl+C
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down...");
        }

        let _ = shutdown_tx_clone.send(true);
    });

    // Run the server
    server.run(shutdown_rx).await
}

/// Log the destination policy; allow-all is a development setting
fn log_security(config: &RelayConfig) {
    if config.allowlist.is_allow_all() {
        warn!("All UDP destinations allowed (development mode)");
        warn!("Set ALLOWED_UDP_HOSTS for production");
    } else {
        info!("Allowed UDP destinations: {}", config.allowlist);
    }
    info!("Maximum message size: {} bytes", config.max_body_bytes);
}

/// Setup logging based on configuration
fn setup_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
