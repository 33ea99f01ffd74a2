// ABOUTME: The deployment orchestrator: workspace, key, push, hooks, restart.
// ABOUTME: Short-circuits on step failure and always tears down key and workspace.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::credential::CredentialManager;
use crate::diagnostics::{Diagnostics, Warning};
use crate::git::GitPusher;
use crate::hooks::{HookResult, HookRunner};
use crate::platform::{HttpPlatform, PlatformApi};
use crate::process::{CommandRunner, SystemRunner};
use crate::relay::{RendezvousRelay, StreamRelay};
use crate::restart::restart_processes;
use crate::types::{AppName, DeployUid, KeyName, RandomUid, UidSource};
use crate::workspace::Workspace;

use super::actions::{ActionLog, ActionOutcome};
use super::error::DeployError;
use super::state::DeployState;
use super::teardown::Teardown;

/// One deployment invocation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub app: AppName,
    pub uid: DeployUid,
}

impl DeploymentRequest {
    pub fn new(app: AppName, uid: DeployUid) -> Self {
        Self { app, uid }
    }

    pub fn key_name(&self) -> KeyName {
        KeyName::for_uid(&self.uid)
    }
}

/// Everything that happened during one deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub app: AppName,
    pub uid: DeployUid,
    pub succeeded: bool,
    /// Last pipeline state reached before teardown.
    pub reached: DeployState,
    /// Where the run ended. Always `CleanedUp` once teardown has run.
    pub state: DeployState,
    pub actions: Vec<ActionOutcome>,
    pub cleanup: Vec<ActionOutcome>,
    pub warnings: Vec<String>,
    pub workspace: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeploymentReport {
    pub fn key_name(&self) -> KeyName {
        KeyName::for_uid(&self.uid)
    }
}

/// Mutable bookkeeping for a single run, shared by the pipeline and teardown.
struct Progress {
    state: DeployState,
    actions: ActionLog,
    diagnostics: Diagnostics,
    workspace: Option<Workspace>,
}

/// Runs deployments against one configuration.
pub struct Deployer {
    config: Config,
    platform: Arc<dyn PlatformApi>,
    runner: Arc<dyn CommandRunner>,
    relay: Arc<dyn StreamRelay>,
    uids: Arc<dyn UidSource>,
    temp_root: PathBuf,
}

impl Deployer {
    pub fn new(
        config: Config,
        platform: Arc<dyn PlatformApi>,
        runner: Arc<dyn CommandRunner>,
        relay: Arc<dyn StreamRelay>,
    ) -> Self {
        Self {
            config,
            platform,
            runner,
            relay,
            uids: Arc::new(RandomUid),
            temp_root: std::env::temp_dir(),
        }
    }

    /// Build a deployer that talks to the real platform, git and ssh-keygen.
    pub fn from_config(config: Config) -> crate::error::Result<Self> {
        let platform = HttpPlatform::from_config(&config.platform)?;
        let relay = RendezvousRelay::new(
            config.platform.relay_connect_timeout,
            config.platform.relay_timeout,
        );
        Ok(Self::new(
            config,
            Arc::new(platform),
            Arc::new(SystemRunner),
            Arc::new(relay),
        ))
    }

    pub fn with_uid_source(mut self, uids: Arc<dyn UidSource>) -> Self {
        self.uids = uids;
        self
    }

    /// Directory under which workspaces are created. Defaults to the system temp dir.
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    /// Deploy `app`, returning whether every attempted step succeeded.
    pub async fn deploy(&self, app: &AppName) -> bool {
        self.deploy_with_report(app).await.succeeded
    }

    /// Deploy `app` and return the full report.
    ///
    /// Teardown runs even if a step panics; the panic is resumed afterwards.
    pub async fn deploy_with_report(&self, app: &AppName) -> DeploymentReport {
        let request = DeploymentRequest::new(app.clone(), self.uids.generate());
        let started_at = Utc::now();
        tracing::info!("Deploying {} (uid {})", request.app, request.uid);

        let mut progress = Progress {
            state: DeployState::Init,
            actions: ActionLog::default(),
            diagnostics: Diagnostics::default(),
            workspace: None,
        };

        let pipeline = AssertUnwindSafe(self.run_pipeline(&request, &mut progress))
            .catch_unwind()
            .await;

        let reached = progress.state;
        let teardown = Teardown::new(self.credentials(), request.key_name());
        let cleanup = teardown
            .run(progress.workspace.take(), &mut progress.diagnostics)
            .await;
        progress.state = DeployState::CleanedUp;

        let stopped_at = match pipeline {
            Ok(result) => result.err(),
            Err(panic) => std::panic::resume_unwind(panic),
        };
        if let Some(e) = &stopped_at {
            tracing::debug!("Pipeline stopped at {} ({:?})", reached, e.kind());
        }

        let succeeded = stopped_at.is_none() && progress.actions.all_succeeded();
        if succeeded {
            tracing::info!("Deployment of {} succeeded", request.app);
        } else {
            tracing::error!("Deployment of {} failed", request.app);
        }

        DeploymentReport {
            workspace: Workspace::path_for(&self.temp_root, &request.uid),
            app: request.app,
            uid: request.uid,
            succeeded,
            reached,
            state: progress.state,
            actions: progress.actions.into_outcomes(),
            cleanup: cleanup.into_outcomes(),
            warnings: progress
                .diagnostics
                .into_warnings()
                .into_iter()
                .map(|w| w.message)
                .collect(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn credentials(&self) -> CredentialManager<'_> {
        CredentialManager::new(self.platform.as_ref(), self.runner.as_ref())
    }

    /// Main pipeline. An `Err` means a step failed and later steps were skipped.
    async fn run_pipeline(
        &self,
        request: &DeploymentRequest,
        progress: &mut Progress,
    ) -> Result<(), DeployError> {
        let created = progress.actions.record(
            "create workspace",
            Workspace::create(&self.temp_root, &request.uid).map_err(DeployError::from),
        )?;
        let workspace: &Workspace = progress.workspace.insert(created);
        progress.state = DeployState::WorkspaceReady;

        let credentials = self.credentials();
        let key_name = request.key_name();
        let keypair = progress.actions.record(
            format!("generate key {key_name}"),
            credentials
                .generate_keypair(workspace, &key_name)
                .await
                .map_err(DeployError::KeyGeneration),
        )?;
        progress.actions.record(
            format!("register key {key_name}"),
            credentials
                .register(&keypair)
                .await
                .map_err(DeployError::KeyRegistration),
        )?;
        progress.state = DeployState::CredentialReady;

        let remote = self.config.platform.git_remote(&request.app);
        progress.actions.record(
            format!("push to {remote}"),
            GitPusher::new(self.runner.as_ref())
                .push(workspace, &request.app, &self.config)
                .await
                .map_err(DeployError::from),
        )?;
        progress.state = DeployState::Pushed;

        let hooks = HookRunner::new(self.platform.as_ref(), self.relay.as_ref());
        let results = hooks
            .run_post_deploy(&request.app, &self.config.post_deploy_commands)
            .await;
        for result in results {
            record_hook(progress, result);
        }
        progress.state = DeployState::HooksRun;

        if !self.config.restart_processes {
            return Ok(());
        }
        if !progress.actions.all_succeeded() {
            tracing::warn!("Skipping process restart of {} after failures", request.app);
            return Ok(());
        }

        progress.actions.record(
            format!("restart processes of {}", request.app),
            restart_processes(self.platform.as_ref(), &request.app)
                .await
                .map_err(DeployError::from),
        )?;
        progress.state = DeployState::Restarted;

        Ok(())
    }
}

fn record_hook(progress: &mut Progress, result: HookResult) {
    if result.status_unknown() {
        progress.diagnostics.warn(Warning::exit_status_unknown(format!(
            "'{}' finished without reporting an exit status",
            result.command
        )));
    }

    let outcome = if result.success {
        Ok(())
    } else {
        Err(DeployError::HookExecution(format!(
            "'{}': {}",
            result.command,
            result.error.as_deref().unwrap_or("failed")
        )))
    };
    let _ = progress
        .actions
        .record(format!("run '{}'", result.command), outcome);
}
