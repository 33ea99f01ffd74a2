// ABOUTME: Deploy command implementation.
// ABOUTME: Resolves the app, applies flag overrides and runs the Deployer.

use headless::deploy::Deployer;
use headless::error::{Error, Result};
use headless::output::Output;
use headless::types::AppName;
use std::path::Path;

/// Deploy one app using the discovered (or given) configuration.
pub async fn deploy(
    app: Option<&str>,
    config_path: Option<&Path>,
    force: bool,
    restart: bool,
    mut output: Output,
) -> Result<()> {
    let mut config = super::load_config(config_path)?;

    let app = match app {
        Some(name) => AppName::new(name)?,
        None => config.app.clone().ok_or(Error::MissingApp)?,
    };

    // Flags can only turn behaviour on; the config stays the source of defaults.
    config.force_push |= force;
    config.restart_processes |= restart;

    output.start_timer();
    output.progress(&format!(
        "Deploying {} to {}",
        app,
        config.platform.git_remote(&app)
    ));

    let deployer = Deployer::from_config(config)?;
    let report = deployer.deploy_with_report(&app).await;
    output.report(&report);

    if report.succeeded {
        output.success(&format!("Deployed {app}"));
        Ok(())
    } else {
        Err(Error::DeploymentFailed(app.to_string()))
    }
}
