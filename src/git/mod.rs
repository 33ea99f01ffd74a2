// ABOUTME: Pushes HEAD to the platform's git remote using the ephemeral deploy key.
// ABOUTME: SSH is redirected through a per-workspace GIT_SSH wrapper; global SSH config is untouched.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{CommandLineError, Config};
use crate::process::{CommandRunner, CommandSpec};
use crate::types::AppName;
use crate::workspace::Workspace;

/// Environment variable git consults for its SSH transport.
pub const GIT_SSH_ENV: &str = "GIT_SSH";

/// Every deploy updates the remote's master branch from the local HEAD.
pub const PUSH_REFSPEC: &str = "HEAD:refs/heads/master";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to write ssh wrapper {path}: {source}")]
    Wrapper {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid command '{command}': {source}")]
    InvalidCommand {
        command: String,
        source: CommandLineError,
    },

    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Shell script forcing ssh onto the deploy key without host key checks.
///
/// Host keys are not verified because the key is single-use and only ever
/// authorised for this one push.
pub fn ssh_wrapper_script(private_key: &Path) -> String {
    format!(
        "#!/bin/sh\nexec ssh -o StrictHostKeyChecking=no -o CheckHostIP=no -o UserKnownHostsFile=/dev/null -o IdentitiesOnly=yes -i {} -- \"$@\"\n",
        crate::config::quote(&private_key.to_string_lossy())
    )
}

/// Write the wrapper script into the workspace and make it executable.
pub fn write_ssh_wrapper(workspace: &Workspace) -> Result<PathBuf, GitError> {
    let path = workspace.ssh_wrapper_path();
    let wrap_err = |source| GitError::Wrapper {
        path: path.clone(),
        source,
    };

    let private_key = std::path::absolute(workspace.private_key_path()).map_err(wrap_err)?;
    std::fs::write(&path, ssh_wrapper_script(&private_key)).map_err(wrap_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o740))
            .map_err(wrap_err)?;
    }

    Ok(path)
}

/// The push invocation. `-f` is present exactly when `force` is set.
pub fn push_command(remote: &str, force: bool, ssh_wrapper: &Path) -> CommandSpec {
    let mut cmd = CommandSpec::new("git").arg("push");
    if force {
        cmd = cmd.arg("-f");
    }
    cmd.args(["-u", remote, PUSH_REFSPEC])
        .env(GIT_SSH_ENV, ssh_wrapper.to_string_lossy())
}

/// Runs pre-deploy git commands and the push itself.
pub struct GitPusher<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> GitPusher<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Run every pre-deploy command, then push.
    ///
    /// Stops at the first failing command; the push is only attempted when
    /// all of them succeeded. There is exactly one push attempt.
    pub async fn push(
        &self,
        workspace: &Workspace,
        app: &AppName,
        config: &Config,
    ) -> Result<(), GitError> {
        let wrapper = write_ssh_wrapper(workspace)?;

        for command in &config.pre_deploy_git_commands {
            let invalid = |source| GitError::InvalidCommand {
                command: command.to_string(),
                source,
            };
            let argv = command.to_argv().map_err(invalid)?;
            let spec = CommandSpec::from_argv(&argv)
                .ok_or_else(|| invalid(CommandLineError::Empty))?
                .env(GIT_SSH_ENV, wrapper.to_string_lossy());

            tracing::info!("Running pre-deploy command: {}", command);
            self.run(&spec).await?;
        }

        let remote = config.platform.git_remote(app);
        tracing::info!("Pushing HEAD to {}", remote);
        self.run(&push_command(&remote, config.force_push, &wrapper))
            .await
    }

    async fn run(&self, spec: &CommandSpec) -> Result<(), GitError> {
        let output = self
            .runner
            .run(spec)
            .await
            .map_err(|source| GitError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        if !output.success() {
            return Err(GitError::CommandFailed {
                command: spec.to_string(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
