//! Per-request UDP send path
//!
//! Every message gets its own socket, bound on an ephemeral port in the
//! address family of the destination and dropped once the send returns.

use crate::error::RelayError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

/// Resolve `host:port` to the first socket address returned
pub async fn resolve_destination(host: &str, port: u16) -> Result<SocketAddr, RelayError> {
    let destination = format!("{}:{}", host, port);

    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| RelayError::Resolve {
            destination: destination.clone(),
            source,
        })?;

    addrs.next().ok_or_else(|| RelayError::Resolve {
        destination,
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"),
    })
}

/// Unspecified local address of the same family as `target`
fn local_bind_addr(target: &SocketAddr) -> SocketAddr {
    let ip = match target {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    SocketAddr::new(ip, 0)
}

/// Send `payload` as a single datagram to `target`
///
/// Returns the number of bytes handed to the OS. The socket lives only for
/// the duration of this call.
pub async fn send_datagram(target: SocketAddr, payload: &[u8]) -> Result<usize, RelayError> {
    let socket = UdpSocket::bind(local_bind_addr(&target))
        .await
        .map_err(RelayError::Bind)?;

    let sent = socket
        .send_to(payload, target)
        .await
        .map_err(RelayError::Send)?;

    debug!(
        "Sent {} bytes from {:?} to {}",
        sent,
        socket.local_addr().ok(),
        target
    );
    Ok(sent)
}
