// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates headless.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::AppName;

use super::{CONFIG_FILENAME, Config};

pub fn init_config(dir: &Path, app: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(a) = app {
        config.app = Some(AppName::new(a)?);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let app = config
        .app
        .as_ref()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "my-app".to_string());

    format!(
        r#"app: {}
force_push: {}
restart_processes: {}

# Local git commands run before the push. GIT_SSH points at the deploy key.
pre_deploy_git_commands: []
#  - git fetch --unshallow

# Commands run on the platform after the push, in order.
post_deploy_commands:
  - rake db:migrate

platform:
  api_url: {}
  git_host: {}
  api_key:
    env: HEADLESS_API_KEY
  # request_timeout: 30s
  # relay_timeout: 1h
"#,
        app,
        config.force_push,
        config.restart_processes,
        config.platform.api_url,
        config.platform.git_host,
    )
}
