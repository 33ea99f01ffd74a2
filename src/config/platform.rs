// ABOUTME: Platform connection settings: API endpoint, git host, credentials, timeouts.
// ABOUTME: Durations are humantime strings such as "30s" or "1h".

use serde::Deserialize;
use std::time::Duration;

use super::EnvValue;
use crate::error::{Error, Result};
use crate::types::AppName;

pub const DEFAULT_API_URL: &str = "https://api.heroku.com";
pub const DEFAULT_GIT_HOST: &str = "heroku.com";

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Host serving the git remotes (`git@<host>:<app>.git`).
    #[serde(default = "default_git_host")]
    pub git_host: String,

    #[serde(default)]
    pub api_key: Option<EnvValue>,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default = "default_relay_connect_timeout", with = "humantime_serde")]
    pub relay_connect_timeout: Duration,

    /// Upper bound on a single attached post-deploy session.
    #[serde(default = "default_relay_timeout", with = "humantime_serde")]
    pub relay_timeout: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_git_host() -> String {
    DEFAULT_GIT_HOST.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_relay_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_relay_timeout() -> Duration {
    Duration::from_secs(60 * 60)
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            git_host: default_git_host(),
            api_key: None,
            request_timeout: default_request_timeout(),
            relay_connect_timeout: default_relay_connect_timeout(),
            relay_timeout: default_relay_timeout(),
        }
    }
}

impl PlatformConfig {
    /// Git remote the app's code is pushed to.
    pub fn git_remote(&self, app: &AppName) -> String {
        format!("git@{}:{}.git", self.git_host, app)
    }

    /// Resolve the API key, if one is configured.
    pub fn resolve_api_key(&self) -> Result<Option<String>> {
        self.api_key.as_ref().map(EnvValue::resolve).transpose()
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| Error::InvalidConfig(format!("platform.api_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "platform.api_url: unsupported scheme '{}'",
                url.scheme()
            )));
        }

        if self.git_host.is_empty() || self.git_host.contains(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!(
                "platform.git_host: invalid host '{}'",
                self.git_host
            )));
        }

        Ok(())
    }
}
