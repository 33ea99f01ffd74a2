// ABOUTME: Deployment orchestration: the pipeline, its state, outcomes and teardown.
// ABOUTME: Exports the Deployer and the report it produces.

mod actions;
mod deployer;
mod error;
mod state;
mod teardown;

pub use actions::{ActionLog, ActionOutcome};
pub use deployer::{DeploymentReport, DeploymentRequest, Deployer};
pub use error::{CleanupError, DeployError, DeployErrorKind};
pub use state::DeployState;
