//! Route handlers

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::{self, ErrorResponse, RelayOutcome, RelayRequest};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Service name reported by the liveness descriptor
pub const SERVICE_NAME: &str = "CoT UDP Proxy";

/// Liveness/identity descriptor returned by `GET /`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"running"`
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// `GET /`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: SERVICE_NAME,
        version: crate::VERSION,
    })
}

/// `POST /cot`
///
/// Destination checks happen before the body is read so a rejected request
/// never costs a body transfer or a socket.
pub async fn relay_cot(
    State(config): State<Arc<RelayConfig>>,
    headers: HeaderMap,
    body: Body,
) -> RelayOutcome {
    let (host, port) = match relay::check_destination(&config.allowlist, &headers) {
        Ok(destination) => destination,
        Err(reason) => return RelayOutcome::Rejected { reason },
    };

    let payload = match axum::body::to_bytes(body, config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error reading body: {}", e);
            return RelayOutcome::Rejected {
                reason: RelayError::BodyRead(e.to_string()),
            };
        }
    };

    let request = RelayRequest::new(payload, host, port);
    relay::forward(&request).await
}

/// Fallback for every unmatched method or path
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))).into_response()
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
