// ABOUTME: Command module aggregator for the headless CLI.
// ABOUTME: Re-exports the deploy, init and check command handlers.

mod check;
mod deploy;
mod init;

pub use check::check;
pub use deploy::deploy;
pub use init::init;

use headless::config::Config;
use headless::error::Result;
use std::env;
use std::path::Path;

/// Load an explicit config file, or discover one in the current directory.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}
