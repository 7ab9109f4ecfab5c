//! Test utilities for cotrelay
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use cotrelay::config::RelayConfig;
use cotrelay::{Allowlist, RelayServer};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A relay running on an ephemeral port
pub struct TestRelay {
    /// HTTP address of the relay
    pub addr: SocketAddr,
    shutdown_tx: broadcast::Sender<bool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestRelay {
    /// Start a relay with the given configuration
    pub async fn start(config: RelayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = RelayServer::from_listener(config, listener);
        let addr = server.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(server.run(shutdown_rx));

        TestRelay {
            addr,
            shutdown_tx,
            handle,
        }
    }

    /// URL for `path` on this relay
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the relay and wait for it to exit
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("relay did not stop in time")
            .unwrap();
        assert!(result.is_ok());
    }
}

/// Test configuration builder
#[derive(Default)]
pub struct TestConfigBuilder {
    allowed: Option<String>,
    max_body_bytes: Option<usize>,
}

impl TestConfigBuilder {
    /// Create a new test config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comma-separated allowlist
    pub fn allowed(mut self, spec: &str) -> Self {
        self.allowed = Some(spec.to_string());
        self
    }

    /// Set the body limit
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> RelayConfig {
        let defaults = RelayConfig::default();
        RelayConfig {
            allowlist: self
                .allowed
                .as_deref()
                .map(Allowlist::parse)
                .unwrap_or_default(),
            max_body_bytes: self.max_body_bytes.unwrap_or(defaults.max_body_bytes),
            ..defaults
        }
    }
}

/// Bind a UDP receiver on an ephemeral loopback port
pub async fn udp_receiver() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

/// Wait for one datagram, failing the test after two seconds
pub async fn recv_datagram(socket: &UdpSocket) -> Vec<u8> {
    let mut buf = vec![0u8; 65_536];
    let (n, _) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("no datagram received")
        .unwrap();
    buf.truncate(n);
    buf
}

/// Assert that no datagram arrives within a short window
pub async fn assert_no_datagram(socket: &UdpSocket) {
    let mut buf = [0u8; 1024];
    let result =
        tokio::time::timeout(Duration::from_millis(300), socket.recv_from(&mut buf)).await;
    assert!(result.is_err(), "unexpected datagram received");
}
