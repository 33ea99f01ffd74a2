// ABOUTME: Per-deployment identifiers and the SSH key names derived from them.
// ABOUTME: Every path and credential a deployment touches is namespaced by its uid.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Prefix of every credential name registered with the platform.
pub const KEY_NAME_PREFIX: &str = "deployer-";

/// Unique identifier of a single deployment invocation.
///
/// Generated fresh for every run and never reused. Two concurrent deployments
/// on the same host only ever share state through the platform itself, because
/// everything local (workspace path, key name) is derived from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeployUid(Uuid);

impl DeployUid {
    /// Generate a new random uid.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DeployUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl serde::Serialize for DeployUid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Error)]
#[error("invalid deployment uid: {0}")]
pub struct ParseUidError(#[from] uuid::Error);

impl FromStr for DeployUid {
    type Err = ParseUidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Name of the ephemeral SSH key registered for one deployment.
///
/// Only constructible from a uid, so revocation always targets the key
/// created by the same run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyName(String);

impl KeyName {
    pub fn for_uid(uid: &DeployUid) -> Self {
        Self(format!("{KEY_NAME_PREFIX}{uid}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of deployment uids.
pub trait UidSource: Send + Sync {
    fn generate(&self) -> DeployUid;
}

/// Random (UUIDv4) uids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUid;

impl UidSource for RandomUid {
    fn generate(&self) -> DeployUid {
        DeployUid::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_name_is_prefixed_uid() {
        let uid: DeployUid = "0f8fad5b-d9cb-469f-a165-70867728950e".parse().unwrap();
        assert_eq!(
            KeyName::for_uid(&uid).as_str(),
            "deployer-0f8fad5b-d9cb-469f-a165-70867728950e"
        );
    }

    #[test]
    fn same_uid_gives_same_key_name() {
        let uid = DeployUid::generate();
        assert_eq!(KeyName::for_uid(&uid), KeyName::for_uid(&uid));
    }

    #[test]
    fn random_uids_differ() {
        let source = RandomUid;
        assert_ne!(source.generate(), source.generate());
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-uid".parse::<DeployUid>().is_err());
    }
}
