// ABOUTME: Uid-scoped temporary directory holding the deploy key and git ssh wrapper.
// ABOUTME: Removed explicitly at teardown, and on drop if teardown never happened.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::DeployUid;

/// Directory under the system temp root that holds all workspaces.
pub const WORKSPACE_DIR: &str = "headless-deployer";

const PRIVATE_KEY_FILE: &str = "id_rsa";
const PUBLIC_KEY_FILE: &str = "id_rsa.pub";
const SSH_WRAPPER_FILE: &str = "git-ssh";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Ephemeral directory owned by exactly one deployment.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    removed: bool,
}

impl Workspace {
    /// Path a workspace for `uid` would live at.
    pub fn path_for(temp_root: &Path, uid: &DeployUid) -> PathBuf {
        temp_root.join(WORKSPACE_DIR).join(uid.to_string())
    }

    /// Create the workspace directory. Fails if it already exists.
    pub fn create(temp_root: &Path, uid: &DeployUid) -> Result<Self, WorkspaceError> {
        let root = Self::path_for(temp_root, uid);
        let create_err = |source| WorkspaceError::Create {
            path: root.clone(),
            source,
        };

        if let Some(parent) = root.parent() {
            std::fs::create_dir_all(parent).map_err(create_err)?;
        }

        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&root).map_err(create_err)?;

        tracing::debug!("Created workspace {}", root.display());
        Ok(Self {
            root,
            removed: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.root.join(PRIVATE_KEY_FILE)
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.root.join(PUBLIC_KEY_FILE)
    }

    pub fn ssh_wrapper_path(&self) -> PathBuf {
        self.root.join(SSH_WRAPPER_FILE)
    }

    /// Remove the workspace and everything in it.
    ///
    /// A directory that is already gone counts as removed.
    pub fn destroy(mut self) -> Result<(), WorkspaceError> {
        self.removed = true;
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {
                tracing::debug!("Removed workspace {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Remove {
                path: self.root.clone(),
                source,
            }),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}
