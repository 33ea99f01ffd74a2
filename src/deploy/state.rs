// ABOUTME: Pipeline states a deployment moves through.
// ABOUTME: Failure is tracked separately; teardown moves every run to CleanedUp.

use serde::Serialize;
use std::fmt;

/// How far a deployment got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    /// Nothing created yet.
    Init,
    /// Workspace directory exists.
    WorkspaceReady,
    /// Deploy key generated and registered.
    CredentialReady,
    /// Code pushed.
    Pushed,
    /// Post-deploy commands attempted.
    HooksRun,
    /// Processes restarted.
    Restarted,
    /// Key revoked and workspace removed. Terminal.
    CleanedUp,
}

impl DeployState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployState::Init => "init",
            DeployState::WorkspaceReady => "workspace_ready",
            DeployState::CredentialReady => "credential_ready",
            DeployState::Pushed => "pushed",
            DeployState::HooksRun => "hooks_run",
            DeployState::Restarted => "restarted",
            DeployState::CleanedUp => "cleaned_up",
        }
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
