// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "headless")]
#[command(about = "Unattended git-push deployments with single-use SSH keys")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a headless.yml template in the current directory
    Init {
        /// App name to put in the template
        #[arg(short, long)]
        app: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy the current repository
    Deploy {
        /// App to deploy (defaults to `app` from the config)
        app: Option<String>,

        /// Config file (defaults to discovery in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force-push, overriding `force_push` in the config
        #[arg(short, long)]
        force: bool,

        /// Restart processes after deploying, overriding `restart_processes`
        #[arg(short, long)]
        restart: bool,
    },

    /// Validate the configuration and print it
    Check {
        /// Config file (defaults to discovery in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
