// ABOUTME: Local subprocess execution behind a trait, used for ssh-keygen and git.
// ABOUTME: Commands are always argument lists; nothing goes through a local shell.

use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::quote;

/// A program invocation: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Build from an argv whose first element is the program.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Value of an extra environment variable, if set.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Result of a finished local command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; None if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs local commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command; `Err` only when it could not be started or waited on.
    async fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
        tracing::debug!("Running {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        for line in result.stdout.lines().chain(result.stderr.lines()) {
            tracing::info!(target: "headless::process", "{}: {}", command.program, line);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments() {
        let spec = CommandSpec::new("git").args(["commit", "-m", "two words"]);
        assert_eq!(spec.to_string(), "git commit -m 'two words'");
    }

    #[test]
    fn from_argv_splits_program() {
        let argv = vec!["git".to_string(), "fetch".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "git");
        assert_eq!(spec.args, vec!["fetch"]);
        assert!(CommandSpec::from_argv(&[]).is_none());
    }

    #[test]
    fn env_var_lookup() {
        let spec = CommandSpec::new("git").env("GIT_SSH", "/tmp/x/git-ssh");
        assert_eq!(spec.env_var("GIT_SSH"), Some("/tmp/x/git-ssh"));
        assert_eq!(spec.env_var("HOME"), None);
    }

    #[tokio::test]
    async fn system_runner_reports_exit_code() {
        let ok = SystemRunner
            .run(&CommandSpec::new("sh").args(["-c", "echo hi"]))
            .await
            .unwrap();
        assert!(ok.success());
        assert_eq!(ok.stdout.trim(), "hi");

        let failed = SystemRunner
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap();
        assert!(!failed.success());
        assert_eq!(failed.exit_code, Some(3));
    }

    #[tokio::test]
    async fn system_runner_passes_env() {
        let out = SystemRunner
            .run(
                &CommandSpec::new("sh")
                    .args(["-c", "echo $HEADLESS_TEST_VALUE"])
                    .env("HEADLESS_TEST_VALUE", "present"),
            )
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "present");
    }

    #[tokio::test]
    async fn missing_program_is_io_error() {
        let result = SystemRunner
            .run(&CommandSpec::new("headless-no-such-program"))
            .await;
        assert!(result.is_err());
    }
}
