// ABOUTME: Library root for headless - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod credential;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod git;
pub mod hooks;
pub mod output;
pub mod platform;
pub mod process;
pub mod relay;
pub mod restart;
pub mod tls;
pub mod types;
pub mod workspace;
