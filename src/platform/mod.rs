// ABOUTME: Contract for the hosting platform's API: keys, process restart, one-off processes.
// ABOUTME: The HTTP implementation lives in http.rs; tests substitute their own.

mod http;

pub use http::HttpPlatform;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::types::{AppName, KeyName};

/// Response to a one-off process request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessResponse {
    /// Present when the process was started attached; its output is
    /// available through the relay at this URL.
    #[serde(default)]
    pub rendezvous_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid platform URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("platform returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

impl PlatformError {
    /// HTTP status of the response, if the platform answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            PlatformError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Calls the deployer makes against the platform.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Register an OpenSSH public key for the authenticated account.
    async fn post_key(&self, public_key: &str) -> Result<(), PlatformError>;

    /// Remove a previously registered key by its comment/name.
    async fn delete_key(&self, name: &KeyName) -> Result<(), PlatformError>;

    /// Restart all processes of an app, returning the raw response body.
    async fn restart_processes(&self, app: &AppName) -> Result<String, PlatformError>;

    /// Start a one-off process running `command` in the app's environment.
    async fn run_process(
        &self,
        app: &AppName,
        command: &str,
        attach: bool,
    ) -> Result<ProcessResponse, PlatformError>;
}
