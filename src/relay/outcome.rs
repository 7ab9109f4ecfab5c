//! Forwarding outcomes and their JSON bodies

use crate::error::RelayError;
use axum::http::StatusCode;
use serde::Serialize;

/// Body of a successful forward
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SuccessResponse {
    /// Always `true`
    pub success: bool,
    /// `host:port` the datagram was sent to
    pub destination: String,
    /// Payload size in bytes
    pub size: usize,
}

/// Body of every failure
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human readable reason
    pub error: String,
}

impl ErrorResponse {
    /// Build a failure body
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}

/// Result of one forwarding attempt
#[derive(Debug)]
pub enum RelayOutcome {
    /// Datagram handed to the OS
    Forwarded {
        /// `host:port` the datagram was sent to
        destination: String,
        /// Payload size in bytes
        byte_count: usize,
    },
    /// Request refused before any send was attempted
    Rejected {
        /// Why the request was refused
        reason: RelayError,
    },
    /// Resolution, socket creation or send failed
    SendFailed {
        /// Underlying failure
        reason: RelayError,
    },
}

impl RelayOutcome {
    /// HTTP status for this outcome
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayOutcome::Forwarded { .. } => StatusCode::OK,
            RelayOutcome::Rejected { reason } | RelayOutcome::SendFailed { reason } => {
                reason.status_code()
            }
        }
    }

    /// Whether the datagram was sent
    pub fn is_forwarded(&self) -> bool {
        matches!(self, RelayOutcome::Forwarded { .. })
    }

    /// JSON body for this outcome
    pub fn to_json(&self) -> serde_json::Value {
        let body = match self {
            RelayOutcome::Forwarded {
                destination,
                byte_count,
            } => serde_json::to_value(SuccessResponse {
                success: true,
                destination: destination.clone(),
                size: *byte_count,
            }),
            RelayOutcome::Rejected { reason } | RelayOutcome::SendFailed { reason } => {
                serde_json::to_value(ErrorResponse::new(reason.to_string()))
            }
        };
        body.unwrap_or_default()
    }
}

impl From<RelayError> for RelayOutcome {
    fn from(reason: RelayError) -> Self {
        match reason {
            RelayError::Resolve { .. } | RelayError::Bind(_) | RelayError::Send(_) => {
                RelayOutcome::SendFailed { reason }
            }
            reason => RelayOutcome::Rejected { reason },
        }
    }
}
