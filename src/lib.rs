//! # cotrelay - HTTP to UDP relay for CoT messages
//!
//! cotrelay lets clients that can only speak HTTP (typically browsers) deliver
//! Cursor-on-Target events to receivers that only listen for UDP datagrams.
//! Each `POST /cot` carries one message; the relay checks the requested
//! destination against an operator allowlist and forwards the body, unparsed,
//! as a single datagram.
//!
//! ## Features
//!
//! - **Stateless**: every HTTP request is independent; nothing is pooled or cached
//! - **Destination Allowlist**: literal hosts and CIDR ranges (IPv4 and IPv6)
//! - **Browser Friendly**: permissive CORS on every response, including errors
//! - **Fire and Forget**: one best-effort datagram per request, no retries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cotrelay::config::{resolve_config, ConfigOverrides};
//! use cotrelay::server::run_server;
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = resolve_config(None, ConfigOverrides::default())?;
//!     let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//!     run_server(config, shutdown_rx).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HTTP Client -> cotrelay (allowlist check) -> UDP Receiver
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod allowlist;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;

// Re-export commonly used items
pub use allowlist::Allowlist;
pub use config::{resolve_config, RelayConfig};
pub use error::RelayError;
pub use server::{run_server, RelayServer};

/// Version of the cotrelay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
