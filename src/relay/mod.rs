//! HTTP to UDP forwarding
//!
//! Validates a destination against the allowlist and forwards one payload as
//! one datagram. Nothing here knows about HTTP beyond header extraction.

mod outcome;
mod request;
mod sender;

pub use outcome::{ErrorResponse, RelayOutcome, SuccessResponse};
pub use request::{
    destination_host, destination_port, RelayRequest, DEFAULT_UDP_HOST, DEFAULT_UDP_PORT,
    UDP_HOST_HEADER, UDP_PORT_HEADER,
};
pub use sender::{resolve_destination, send_datagram};

use crate::allowlist::Allowlist;
use crate::error::RelayError;
use axum::http::HeaderMap;
use tracing::{error, info, warn};

/// Check the destination headers before the body is read
///
/// The host is checked against the allowlist first, then the port range.
pub fn check_destination(
    allowlist: &Allowlist,
    headers: &HeaderMap,
) -> Result<(String, u16), RelayError> {
    let host = destination_host(headers);
    if !allowlist.is_allowed(&host) {
        warn!("Blocked UDP destination: {} (not in allowlist)", host);
        return Err(RelayError::DestinationNotAllowed(host));
    }

    let port = destination_port(headers).map_err(|e| {
        warn!("Invalid UDP port for {}: {:?}", host, e);
        e
    })?;

    Ok((host, port))
}

/// Forward one request as a single datagram
///
/// A single best-effort attempt: failures are reported, never retried.
pub async fn forward(request: &RelayRequest) -> RelayOutcome {
    let destination = request.destination();

    let result = async {
        let target =
            resolve_destination(&request.destination_host, request.destination_port).await?;
        send_datagram(target, &request.payload).await
    }
    .await;

    match result {
        Ok(_) => {
            info!(
                "Forwarded CoT message to {} ({} bytes)",
                destination,
                request.payload.len()
            );
            RelayOutcome::Forwarded {
                destination,
                byte_count: request.payload.len(),
            }
        }
        Err(e) => {
            error!("Failed to forward to {}: {}", destination, e);
            RelayOutcome::from(e)
        }
    }
}
