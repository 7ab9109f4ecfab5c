//! Error types for the relay
//!
//! This module defines the error taxonomy used by the request handler and
//! maps every variant onto the HTTP status reported to the caller.

use axum::http::StatusCode;
use std::io;
use thiserror::Error;

/// Main error type for relay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Destination host rejected by the allowlist
    #[error("UDP destination not allowed. Configure ALLOWED_UDP_HOSTS environment variable.")]
    DestinationNotAllowed(String),

    /// Destination port missing from `[1, 65535]` or not a number
    #[error("Invalid UDP port number")]
    InvalidPort(String),

    /// Request body could not be read
    #[error("Error reading body: {0}")]
    BodyRead(String),

    /// Destination could not be resolved to a socket address
    #[error("Failed to resolve UDP destination {destination}: {source}")]
    Resolve {
        /// `host:port` that failed to resolve
        destination: String,
        /// Underlying resolver error
        #[source]
        source: io::Error,
    },

    /// Local UDP socket could not be created
    #[error("Error creating UDP socket: {0}")]
    Bind(#[source] io::Error),

    /// Datagram send failed at the OS/network layer
    #[error("UDP send error: {0}")]
    Send(#[source] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl RelayError {
    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::DestinationNotAllowed(_) => StatusCode::FORBIDDEN,
            RelayError::InvalidPort(_) => StatusCode::BAD_REQUEST,
            RelayError::BodyRead(_)
            | RelayError::Resolve { .. }
            | RelayError::Bind(_)
            | RelayError::Send(_)
            | RelayError::Config(_)
            | RelayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error was caused by caller input rather than the network
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
