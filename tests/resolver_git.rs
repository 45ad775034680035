//! Identity resolution against real temporary git repositories.
//!
//! Every test is skipped when the git binary is unavailable.

use std::fs;
use std::path::Path;
use std::process::Stdio;
use tempfile::TempDir;

use repodex::identity::{IdentityError, RemoteKind, RepoIdentity};

fn check_git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A repository with one commit on branch `main` and no remote yet.
fn setup_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    git(path, &["init", "-b", "main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    fs::write(path.join("README.md"), "Initial content").unwrap();
    git(path, &["add", "README.md"]);
    git(path, &["commit", "-m", "Initial commit"]);

    dir
}

#[test]
fn resolves_a_configured_github_remote() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "git@github.com:acme/widgets.git"],
    );

    let identity = RepoIdentity::resolve(repo.path()).unwrap();
    assert_eq!(identity.remote_kind, RemoteKind::Github);
    assert_eq!(identity.owner_repo, "acme/widgets");
    assert_eq!(identity.branch, "main");
    assert_eq!(identity.remote_url, "git@github.com:acme/widgets.git");
}

#[test]
fn resolves_a_renamed_branch() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "https://gitlab.com/team/tool.git"],
    );
    git(repo.path(), &["branch", "-m", "feature/polish"]);

    let identity = RepoIdentity::resolve(repo.path()).unwrap();
    assert_eq!(identity.remote_kind, RemoteKind::Gitlab);
    assert_eq!(identity.owner_repo, "team/tool");
    assert_eq!(identity.branch, "feature/polish");
}

#[test]
fn detached_head_resolves_to_the_commit_hash() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "git@github.com:acme/widgets.git"],
    );
    git(repo.path(), &["checkout", "--detach"]);

    let identity = RepoIdentity::resolve(repo.path()).unwrap();
    assert_ne!(identity.branch, "HEAD");
    assert_eq!(identity.branch.len(), 40);
    assert!(identity.branch.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn a_repo_without_a_remote_fails() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();

    let err = RepoIdentity::resolve(repo.path()).unwrap_err();
    assert!(matches!(err, IdentityError::NoRemote { .. }));
}

#[test]
fn an_unrecognized_remote_host_fails() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "https://example.com/a/b.git"],
    );

    let err = RepoIdentity::resolve(repo.path()).unwrap_err();
    assert!(matches!(err, IdentityError::InvalidRemote { .. }));
}

#[test]
fn a_local_file_remote_fails_as_invalid() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "file:///local/repo"],
    );

    let err = RepoIdentity::resolve(repo.path()).unwrap_err();
    assert!(matches!(err, IdentityError::InvalidRemote { .. }));
}

#[test]
fn an_invalid_remote_wins_over_a_detached_head() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let repo = setup_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "file:///local/repo"],
    );
    git(repo.path(), &["checkout", "--detach"]);

    // The remote is validated before any branch work, so the detached
    // tree never surfaces as a branch-resolution failure here.
    let err = RepoIdentity::resolve(repo.path()).unwrap_err();
    assert!(matches!(err, IdentityError::InvalidRemote { .. }));
}

#[test]
fn a_directory_that_is_not_a_repo_fails() {
    if !check_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();

    let err = RepoIdentity::resolve(dir.path()).unwrap_err();
    assert!(matches!(err, IdentityError::NoRemote { .. }));
}
