// ABOUTME: Integration tests for the ephemeral workspace.
// ABOUTME: Tests uid namespacing, permissions, idempotent destroy and the drop backstop.

use headless::types::DeployUid;
use headless::workspace::{WORKSPACE_DIR, Workspace, WorkspaceError};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

#[test]
fn create_makes_private_directory_under_namespace() {
    let temp = TempDir::new().unwrap();
    let uid = DeployUid::generate();

    let workspace = Workspace::create(temp.path(), &uid).unwrap();

    assert_eq!(
        workspace.root(),
        temp.path().join(WORKSPACE_DIR).join(uid.to_string())
    );
    let mode = std::fs::metadata(workspace.root())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[test]
fn distinct_uids_get_distinct_workspaces() {
    let temp = TempDir::new().unwrap();
    let a = Workspace::create(temp.path(), &DeployUid::generate()).unwrap();
    let b = Workspace::create(temp.path(), &DeployUid::generate()).unwrap();

    assert_ne!(a.root(), b.root());
    assert_ne!(a.private_key_path(), b.private_key_path());
}

#[test]
fn existing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let uid = DeployUid::generate();
    let _first = Workspace::create(temp.path(), &uid).unwrap();

    let err = Workspace::create(temp.path(), &uid).unwrap_err();
    assert!(matches!(err, WorkspaceError::Create { .. }));
}

#[test]
fn destroy_removes_contents() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::create(temp.path(), &DeployUid::generate()).unwrap();
    std::fs::write(workspace.private_key_path(), "key").unwrap();
    std::fs::create_dir(workspace.root().join("nested")).unwrap();
    let root = workspace.root().to_path_buf();

    workspace.destroy().unwrap();

    assert!(!root.exists());
}

#[test]
fn destroying_missing_directory_succeeds() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::create(temp.path(), &DeployUid::generate()).unwrap();
    std::fs::remove_dir_all(workspace.root()).unwrap();

    workspace.destroy().unwrap();
}

#[test]
fn drop_removes_undestroyed_workspace() {
    let temp = TempDir::new().unwrap();
    let root = {
        let workspace = Workspace::create(temp.path(), &DeployUid::generate()).unwrap();
        std::fs::write(workspace.public_key_path(), "pub").unwrap();
        workspace.root().to_path_buf()
    };

    assert!(!root.exists());
}
