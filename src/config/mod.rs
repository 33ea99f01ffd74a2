// ABOUTME: Configuration types and parsing for headless.yml.
// ABOUTME: Deploy switches, hook command lists and platform connection settings.

mod command_line;
mod deserialize;
mod env_value;
mod init;
mod platform;

pub use command_line::{CommandLine, CommandLineError, quote, split};
pub use env_value::EnvValue;
pub use init::init_config;
pub use platform::PlatformConfig;

use crate::error::{Error, Result};
use crate::types::AppName;
use deserialize::deserialize_app_name_option;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "headless.yml";
pub const CONFIG_FILENAME_ALT: &str = "headless.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".headless/config.yml";

/// Deployment configuration, read once and never mutated during a run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// App deployed when none is given on the command line.
    #[serde(default, deserialize_with = "deserialize_app_name_option")]
    pub app: Option<AppName>,

    #[serde(default)]
    pub force_push: bool,

    #[serde(default)]
    pub restart_processes: bool,

    /// Local git commands run before the push, with the deploy key in place.
    #[serde(default)]
    pub pre_deploy_git_commands: Vec<CommandLine>,

    /// Commands run on the platform after a successful push.
    #[serde(default)]
    pub post_deploy_commands: Vec<CommandLine>,

    #[serde(default)]
    pub platform: PlatformConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an all-defaults map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check that every local command can be turned into an argument list.
    ///
    /// Post-deploy commands run in the platform's shell, so only emptiness
    /// is checked for them.
    pub fn validate(&self) -> Result<()> {
        for command in &self.pre_deploy_git_commands {
            command.to_argv().map_err(|e| {
                Error::InvalidConfig(format!("pre_deploy_git_commands: {command}: {e}"))
            })?;
        }

        for command in &self.post_deploy_commands {
            if command.is_empty() {
                return Err(Error::InvalidConfig(
                    "post_deploy_commands: empty command".to_string(),
                ));
            }
        }

        self.platform.validate()
    }

    pub fn template() -> Self {
        Config {
            app: AppName::new("my-app").ok(),
            force_push: false,
            restart_processes: false,
            pre_deploy_git_commands: vec![],
            post_deploy_commands: vec![CommandLine::Line("rake db:migrate".to_string())],
            platform: PlatformConfig::default(),
        }
    }
}
