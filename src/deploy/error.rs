// ABOUTME: Error types for deployment steps and teardown.
// ABOUTME: Step errors stop the pipeline; cleanup errors are only ever reported.

use crate::credential::CredentialError;
use crate::git::GitError;
use crate::restart::RestartError;
use crate::workspace::WorkspaceError;

/// Errors that stop the main deployment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Workspace directory could not be created.
    #[error("workspace setup failed: {0}")]
    Workspace(#[from] WorkspaceError),

    /// ssh-keygen failed or produced an unusable key.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[source] CredentialError),

    /// Platform refused the public key.
    #[error("key registration failed: {0}")]
    KeyRegistration(#[source] CredentialError),

    /// A pre-deploy command or the push failed.
    #[error("git push failed: {0}")]
    GitPush(#[from] GitError),

    /// A post-deploy command failed.
    #[error("post-deploy command failed: {0}")]
    HookExecution(String),

    /// Restart call failed or returned an unexpected body.
    #[error("process restart failed: {0}")]
    Restart(#[from] RestartError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Workspace,
    KeyGeneration,
    KeyRegistration,
    GitPush,
    HookExecution,
    Restart,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Workspace(_) => DeployErrorKind::Workspace,
            DeployError::KeyGeneration(_) => DeployErrorKind::KeyGeneration,
            DeployError::KeyRegistration(_) => DeployErrorKind::KeyRegistration,
            DeployError::GitPush(_) => DeployErrorKind::GitPush,
            DeployError::HookExecution(_) => DeployErrorKind::HookExecution,
            DeployError::Restart(_) => DeployErrorKind::Restart,
        }
    }
}

/// Errors during teardown. Logged and reported, never escalated.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("{0}")]
    Revoke(#[source] CredentialError),

    #[error("{0}")]
    Workspace(#[source] WorkspaceError),
}
