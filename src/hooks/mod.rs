// ABOUTME: Post-deploy hooks: configured commands run as one-off platform processes.
// ABOUTME: Every command is attempted; the hook step succeeds only if all of them did.

use serde::Serialize;

use crate::config::CommandLine;
use crate::platform::PlatformApi;
use crate::relay::{StreamRelay, with_exit_status};
use crate::types::AppName;

/// Result of running one post-deploy command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    pub command: String,
    pub success: bool,
    /// Whether the platform handed out a relay session for the command.
    pub attached: bool,
    /// Remote exit code, when one was reported through the relay.
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HookResult {
    /// An attached session that ended without reporting an exit code.
    pub fn status_unknown(&self) -> bool {
        self.attached && self.success && self.exit_code.is_none()
    }

    fn failed(command: String, attached: bool, error: String) -> Self {
        Self {
            command,
            success: false,
            attached,
            exit_code: None,
            error: Some(error),
        }
    }
}

/// Dispatches post-deploy commands and follows their output.
pub struct HookRunner<'a> {
    platform: &'a dyn PlatformApi,
    relay: &'a dyn StreamRelay,
}

impl<'a> HookRunner<'a> {
    pub fn new(platform: &'a dyn PlatformApi, relay: &'a dyn StreamRelay) -> Self {
        Self { platform, relay }
    }

    /// Run every command in order. A failure does not stop later commands.
    pub async fn run_post_deploy(&self, app: &AppName, commands: &[CommandLine]) -> Vec<HookResult> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            results.push(self.run(app, command).await);
        }
        results
    }

    /// Run a single command on the platform, attaching to its output if possible.
    pub async fn run(&self, app: &AppName, command: &CommandLine) -> HookResult {
        let shown = command.to_string();
        tracing::info!("Running post-deploy command: {}", shown);

        let remote = with_exit_status(&command.to_shell());
        let response = match self.platform.run_process(app, &remote, true).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to dispatch '{}': {}", shown, e);
                return HookResult::failed(shown, false, e.to_string());
            }
        };

        let Some(url) = response.rendezvous_url else {
            tracing::info!("'{}' started detached", shown);
            return HookResult {
                command: shown,
                success: true,
                attached: false,
                exit_code: None,
                error: None,
            };
        };

        match self.relay.attach(&url).await {
            Ok(outcome) if outcome.success() => HookResult {
                command: shown,
                success: true,
                attached: true,
                exit_code: outcome.exit_status,
                error: None,
            },
            Ok(outcome) => {
                tracing::warn!(
                    "'{}' exited with status {:?}",
                    shown,
                    outcome.exit_status
                );
                HookResult {
                    error: Some(format!("exited with status {:?}", outcome.exit_status)),
                    command: shown,
                    success: false,
                    attached: true,
                    exit_code: outcome.exit_status,
                }
            }
            Err(e) => {
                tracing::warn!("Relay session for '{}' failed: {}", shown, e);
                HookResult::failed(shown, true, e.to_string())
            }
        }
    }
}
