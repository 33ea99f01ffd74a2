// ABOUTME: Relay error types with SNAFU pattern.
// ABOUTME: Carries the endpoint for connection failures and the limit for timeouts.

use snafu::Snafu;
use std::time::Duration;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RelayError {
    #[snafu(display("invalid rendezvous URL {url}: {reason}"))]
    InvalidUrl { url: String, reason: String },

    #[snafu(display("failed to connect to {host}:{port}: {source}"))]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[snafu(display("connecting to {host}:{port} timed out after {timeout:?}"))]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[snafu(display("TLS setup for {host} failed: {source}"))]
    Tls {
        host: String,
        source: std::io::Error,
    },

    #[snafu(display("relay stream failed: {source}"))]
    Stream { source: std::io::Error },

    #[snafu(display("session still running after {timeout:?}"))]
    SessionTimeout { timeout: Duration },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayErrorKind {
    /// The platform handed out a URL we cannot use.
    InvalidUrl,
    /// TCP or TLS connection could not be established.
    ConnectionFailed,
    /// The session broke after it was established.
    StreamFailed,
    /// A connect or session limit was hit.
    TimedOut,
}

impl RelayError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RelayErrorKind {
        match self {
            RelayError::InvalidUrl { .. } => RelayErrorKind::InvalidUrl,
            RelayError::Connect { .. } | RelayError::Tls { .. } => {
                RelayErrorKind::ConnectionFailed
            }
            RelayError::Stream { .. } => RelayErrorKind::StreamFailed,
            RelayError::ConnectTimeout { .. } | RelayError::SessionTimeout { .. } => {
                RelayErrorKind::TimedOut
            }
        }
    }
}
