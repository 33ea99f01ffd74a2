// ABOUTME: Init command implementation.
// ABOUTME: Writes a headless.yml template into the current directory.

use headless::config;
use headless::error::Result;
use headless::output::Output;
use std::env;

pub fn init(app: Option<&str>, force: bool, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    config::init_config(&cwd, app, force)?;
    output.success("Created headless.yml");
    Ok(())
}
