// ABOUTME: Cleanup that runs after every deployment, successful or not.
// ABOUTME: Revokes the deploy key first, then removes the workspace.

use crate::credential::CredentialManager;
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::KeyName;
use crate::workspace::Workspace;

use super::actions::{ActionLog, ActionOutcome};
use super::error::CleanupError;

pub(super) struct Teardown<'a> {
    credentials: CredentialManager<'a>,
    key: KeyName,
}

impl<'a> Teardown<'a> {
    pub(super) fn new(credentials: CredentialManager<'a>, key: KeyName) -> Self {
        Self { credentials, key }
    }

    /// Revoke the key exactly once, then destroy the workspace if one exists.
    ///
    /// Failures become warnings; nothing here can fail the deployment.
    pub(super) async fn run(
        self,
        workspace: Option<Workspace>,
        diagnostics: &mut Diagnostics,
    ) -> ActionLog {
        let mut log = ActionLog::default();

        let description = format!("revoke key {}", self.key);
        match self
            .credentials
            .revoke(&self.key)
            .await
            .map_err(CleanupError::Revoke)
        {
            Ok(()) => log.push(ActionOutcome::succeeded(description)),
            Err(e) => {
                diagnostics.warn(Warning::key_revocation(format!(
                    "Deploy key {} may still be registered: {}",
                    self.key, e
                )));
                log.push(ActionOutcome::failed(description, e.to_string()));
            }
        }

        if let Some(workspace) = workspace {
            let description = format!("remove workspace {}", workspace.root().display());
            match workspace.destroy().map_err(CleanupError::Workspace) {
                Ok(()) => log.push(ActionOutcome::succeeded(description)),
                Err(e) => {
                    diagnostics.warn(Warning::workspace_removal(e.to_string()));
                    log.push(ActionOutcome::failed(description, e.to_string()));
                }
            }
        }

        log
    }
}
