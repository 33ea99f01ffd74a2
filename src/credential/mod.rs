// ABOUTME: Ephemeral SSH credential lifecycle: generate, register, revoke.
// ABOUTME: The key is named after the deployment uid so revocation hits exactly this run's key.

use russh::keys::ssh_key::{HashAlg, PublicKey};
use std::path::PathBuf;
use thiserror::Error;

use crate::platform::{PlatformApi, PlatformError};
use crate::process::{CommandRunner, CommandSpec};
use crate::types::KeyName;
use crate::workspace::Workspace;

const KEYGEN_PROGRAM: &str = "ssh-keygen";
const KEY_TYPE: &str = "rsa";
const KEY_BITS: &str = "4096";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to run ssh-keygen: {0}")]
    Spawn(std::io::Error),

    #[error("ssh-keygen exited with status {code:?}: {stderr}")]
    KeygenFailed { code: Option<i32>, stderr: String },

    #[error("failed to read public key {path}: {source}")]
    ReadPublicKey {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("public key comment '{found}' does not match key name '{expected}'")]
    NameMismatch { expected: KeyName, found: String },

    #[error("platform rejected key {name}: {source}")]
    Registration {
        name: KeyName,
        source: PlatformError,
    },

    #[error("failed to revoke key {name}: {source}")]
    Revocation {
        name: KeyName,
        source: PlatformError,
    },
}

/// A freshly generated keypair living inside a workspace.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub name: KeyName,
    pub private_key_path: PathBuf,
    /// OpenSSH public key line, as registered with the platform.
    pub public_key: String,
    /// SHA-256 fingerprint of the public key.
    pub fingerprint: String,
}

/// Generates, registers and revokes deploy keys.
pub struct CredentialManager<'a> {
    platform: &'a dyn PlatformApi,
    runner: &'a dyn CommandRunner,
}

impl<'a> CredentialManager<'a> {
    pub fn new(platform: &'a dyn PlatformApi, runner: &'a dyn CommandRunner) -> Self {
        Self { platform, runner }
    }

    /// The ssh-keygen invocation for a key named `name` in `workspace`.
    pub fn keygen_command(workspace: &Workspace, name: &KeyName) -> CommandSpec {
        CommandSpec::new(KEYGEN_PROGRAM).args([
            "-q".to_string(),
            "-t".to_string(),
            KEY_TYPE.to_string(),
            "-b".to_string(),
            KEY_BITS.to_string(),
            "-N".to_string(),
            String::new(),
            "-C".to_string(),
            name.to_string(),
            "-f".to_string(),
            workspace.private_key_path().to_string_lossy().into_owned(),
        ])
    }

    /// Generate an unencrypted keypair in the workspace.
    pub async fn generate_keypair(
        &self,
        workspace: &Workspace,
        name: &KeyName,
    ) -> Result<KeyPair, CredentialError> {
        let output = self
            .runner
            .run(&Self::keygen_command(workspace, name))
            .await
            .map_err(CredentialError::Spawn)?;

        if !output.success() {
            return Err(CredentialError::KeygenFailed {
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let path = workspace.public_key_path();
        let public_key = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CredentialError::ReadPublicKey {
                path: path.clone(),
                source,
            })?
            .trim()
            .to_string();

        let parsed = PublicKey::from_openssh(&public_key)
            .map_err(|e| CredentialError::InvalidPublicKey(e.to_string()))?;

        if parsed.comment() != name.as_str() {
            return Err(CredentialError::NameMismatch {
                expected: name.clone(),
                found: parsed.comment().to_string(),
            });
        }

        let fingerprint = parsed.fingerprint(HashAlg::Sha256).to_string();
        tracing::info!("Generated deploy key {} ({})", name, fingerprint);

        Ok(KeyPair {
            name: name.clone(),
            private_key_path: workspace.private_key_path(),
            public_key,
            fingerprint,
        })
    }

    /// Register the public key with the platform.
    pub async fn register(&self, keypair: &KeyPair) -> Result<(), CredentialError> {
        self.platform
            .post_key(&keypair.public_key)
            .await
            .map_err(|source| CredentialError::Registration {
                name: keypair.name.clone(),
                source,
            })?;
        tracing::info!("Registered deploy key {}", keypair.name);
        Ok(())
    }

    /// Remove the key from the platform.
    ///
    /// Safe to call whether or not registration happened: a key the platform
    /// does not know is already revoked.
    pub async fn revoke(&self, name: &KeyName) -> Result<(), CredentialError> {
        match self.platform.delete_key(name).await {
            Ok(()) => {
                tracing::info!("Revoked deploy key {}", name);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("Deploy key {} was not registered", name);
                Ok(())
            }
            Err(source) => Err(CredentialError::Revocation {
                name: name.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeployUid;

    #[test]
    fn keygen_command_has_empty_passphrase_and_key_name() {
        let temp = tempfile::tempdir().unwrap();
        let uid = DeployUid::generate();
        let workspace = Workspace::create(temp.path(), &uid).unwrap();
        let name = KeyName::for_uid(&uid);

        let cmd = CredentialManager::keygen_command(&workspace, &name);
        assert_eq!(cmd.program, "ssh-keygen");

        let pos = cmd.args.iter().position(|a| a == "-N").unwrap();
        assert_eq!(cmd.args[pos + 1], "");

        let pos = cmd.args.iter().position(|a| a == "-C").unwrap();
        assert_eq!(cmd.args[pos + 1], name.as_str());

        let pos = cmd.args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(
            PathBuf::from(&cmd.args[pos + 1]),
            workspace.private_key_path()
        );
    }
}
