// ABOUTME: Check command implementation.
// ABOUTME: Loads and validates the configuration, then prints a summary.

use headless::error::Result;
use headless::output::Output;
use std::path::Path;

pub fn check(config_path: Option<&Path>, output: Output) -> Result<()> {
    let config = super::load_config(config_path)?;
    let api_key = config.platform.resolve_api_key()?;

    match &config.app {
        Some(app) => output.progress(&format!("App: {app}")),
        None => output.progress("App: (given on the command line)"),
    }
    output.progress(&format!("API: {}", config.platform.api_url));
    match (&config.platform.api_key, api_key) {
        (Some(value), Some(_)) => output.progress(&format!("API key: set (from {})", value.source())),
        _ => output.progress("API key: not set"),
    }
    output.progress(&format!("Force push: {}", config.force_push));
    output.progress(&format!("Restart processes: {}", config.restart_processes));
    for command in &config.pre_deploy_git_commands {
        output.progress(&format!("Pre-deploy: {command}"));
    }
    for command in &config.post_deploy_commands {
        output.progress(&format!("Post-deploy: {command}"));
    }

    output.success("Configuration is valid");
    Ok(())
}
