// ABOUTME: Optional restart of all remote processes after a deploy.
// ABOUTME: The platform signals success with a body of exactly "ok".

use thiserror::Error;

use crate::platform::{PlatformApi, PlatformError};
use crate::types::AppName;

/// Response body the platform sends for a successful restart.
pub const RESTART_OK_BODY: &str = "ok";

#[derive(Debug, Error)]
pub enum RestartError {
    #[error("restart request failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("unexpected restart response: {0:?}")]
    UnexpectedBody(String),
}

/// Restart every process of `app`.
///
/// The body comparison is exact: a platform answering anything other than
/// `ok` (including `ok\n`) is reported as a failed restart.
pub async fn restart_processes(
    platform: &dyn PlatformApi,
    app: &AppName,
) -> Result<(), RestartError> {
    tracing::info!("Restarting processes of {}", app);
    let body = platform.restart_processes(app).await?;

    if body != RESTART_OK_BODY {
        return Err(RestartError::UnexpectedBody(body));
    }

    Ok(())
}
