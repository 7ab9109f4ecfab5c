//! Relay request extraction
//!
//! Pulls the UDP destination out of the `X-UDP-Host` / `X-UDP-Port` headers.

use crate::error::RelayError;
use axum::http::HeaderMap;
use bytes::Bytes;

/// Header naming the destination host
pub const UDP_HOST_HEADER: &str = "x-udp-host";

/// Header naming the destination port
pub const UDP_PORT_HEADER: &str = "x-udp-port";

/// Destination host used when the header is absent
pub const DEFAULT_UDP_HOST: &str = "127.0.0.1";

/// Destination port used when the header is absent
pub const DEFAULT_UDP_PORT: u16 = 8087;

/// One message to forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Raw message bytes, never parsed
    pub payload: Bytes,
    /// Destination host as supplied by the caller
    pub destination_host: String,
    /// Destination port
    pub destination_port: u16,
}

impl RelayRequest {
    /// Create a new request
    pub fn new(payload: Bytes, destination_host: impl Into<String>, destination_port: u16) -> Self {
        RelayRequest {
            payload,
            destination_host: destination_host.into(),
            destination_port,
        }
    }

    /// `host:port` string reported back to the caller
    pub fn destination(&self) -> String {
        format!("{}:{}", self.destination_host, self.destination_port)
    }
}

/// Read the destination host header
///
/// Falls back to [`DEFAULT_UDP_HOST`] when the header is absent, empty or not
/// valid ASCII.
pub fn destination_host(headers: &HeaderMap) -> String {
    headers
        .get(UDP_HOST_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(DEFAULT_UDP_HOST)
        .to_string()
}

/// Read and range-check the destination port header
///
/// An absent header means [`DEFAULT_UDP_PORT`]. Anything present must be an
/// integer in `[1, 65535]`.
pub fn destination_port(headers: &HeaderMap) -> Result<u16, RelayError> {
    let Some(value) = headers.get(UDP_PORT_HEADER) else {
        return Ok(DEFAULT_UDP_PORT);
    };

    let raw = value
        .to_str()
        .map_err(|_| RelayError::InvalidPort(format!("{:?}", value)))?
        .trim();

    match raw.parse::<i64>() {
        Ok(port) if (1..=i64::from(u16::MAX)).contains(&port) => Ok(port as u16),
        _ => Err(RelayError::InvalidPort(raw.to_string())),
    }
}
