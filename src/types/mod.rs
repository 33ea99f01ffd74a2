// ABOUTME: Validated domain types shared across the deployer.
// ABOUTME: App names, per-run identifiers and the credential names derived from them.

mod app_name;
mod uid;

pub use app_name::{AppName, AppNameError};
pub use uid::{DeployUid, KeyName, ParseUidError, RandomUid, UidSource};
