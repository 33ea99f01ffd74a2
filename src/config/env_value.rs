// ABOUTME: Config values that can be given literally or read from the environment.
// ABOUTME: Keeps secrets such as the platform API key out of headless.yml and out of logs.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// A config value written inline or named by environment variable.
///
/// `api_key: abc123` and `api_key: { env: HEADLESS_API_KEY }` are both
/// accepted. An empty variable counts as unset, so `HEADLESS_API_KEY=` in a
/// CI job falls back to `default` instead of sending a blank credential.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(value) => Ok(value.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .filter(|value| !value.is_empty())
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }

    /// Where the value is read from, for `check` output. Never the value itself.
    pub fn source(&self) -> String {
        match self {
            EnvValue::Literal(_) => "headless.yml".to_string(),
            EnvValue::FromEnv { var, .. } => format!("${var}"),
        }
    }
}

impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("Literal(<redacted>)"),
            EnvValue::FromEnv { var, .. } => f.debug_struct("FromEnv").field("var", var).finish(),
        }
    }
}
