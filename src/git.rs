//! Thin wrappers around the `git` binary.
//!
//! Everything here shells out to git; nothing is reimplemented. Each call
//! returns trimmed stdout text or a tagged error carrying git's stderr.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Failures running the external git binary.
#[derive(Error, Debug)]
pub enum GitError {
    /// The git process could not be started at all.
    #[error("failed to run `git {command}`: {source}. Is git installed?")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited non-zero.
    #[error("`git {command}` failed: {stderr}")]
    Command { command: String, stderr: String },
}

/// Run a git subcommand against the repository at `repo` and return
/// trimmed stdout.
fn run(repo: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|source| GitError::Spawn {
            command: args.join(" "),
            source,
        })?;

    if !output.status.success() {
        return Err(GitError::Command {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// URL of the `origin` remote for the repository at `repo`.
pub fn remote_url(repo: &Path) -> Result<String, GitError> {
    run(repo, &["remote", "get-url", "origin"])
}

/// Symbolic name of the checked-out branch. Returns the literal `HEAD`
/// when the working tree is detached.
pub fn current_branch(repo: &Path) -> Result<String, GitError> {
    run(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Commit hash the working tree currently points at.
pub fn head_commit(repo: &Path) -> Result<String, GitError> {
    run(repo, &["rev-parse", "HEAD"])
}

/// Clone `url` into `dest` with inherited stdio so git's own progress
/// output reaches the terminal.
pub fn clone(url: &str, dest: &Path) -> Result<(), GitError> {
    let status = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest)
        .status()
        .map_err(|source| GitError::Spawn {
            command: format!("clone {}", url),
            source,
        })?;

    if !status.success() {
        return Err(GitError::Command {
            command: format!("clone {}", url),
            stderr: format!("exit status {}", status),
        });
    }

    Ok(())
}
