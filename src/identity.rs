//! Repository identity resolution.
//!
//! Derives the (remote kind, owner/repo, branch) triple that the indexing
//! service addresses repositories by, from a local working directory's git
//! metadata. The raw remote URL is kept alongside the triple because the
//! search payload transmits it verbatim.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::git::{self, GitError};

/// Branch used when git cannot tell us the current one. Deliberate
/// fallback, not an error.
const DEFAULT_BRANCH: &str = "master";

/// Code-hosting provider class inferred from a remote URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Github,
    Gitlab,
    Azure,
    Unknown,
}

impl RemoteKind {
    /// Classify a remote URL by host substring, in fixed priority order.
    /// Total: every input maps to exactly one kind.
    pub fn classify(remote_url: &str) -> RemoteKind {
        if remote_url.contains("github.com") {
            RemoteKind::Github
        } else if remote_url.contains("gitlab.com") {
            RemoteKind::Gitlab
        } else if remote_url.contains("azure.com") {
            RemoteKind::Azure
        } else {
            RemoteKind::Unknown
        }
    }

    /// The kind as the service spells it on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteKind::Github => "github",
            RemoteKind::Gitlab => "gitlab",
            RemoteKind::Azure => "azure",
            RemoteKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors deriving an identity from a working directory.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The directory has no usable `origin` remote.
    #[error("no remote URL configured for {path:?}")]
    NoRemote {
        path: PathBuf,
        #[source]
        source: Option<GitError>,
    },

    /// A detached HEAD could not be resolved to a commit hash.
    #[error("could not resolve the detached HEAD to a commit")]
    BranchResolution {
        #[source]
        source: GitError,
    },

    /// The remote URL is unparseable or points at an unrecognized host.
    #[error("remote URL {url:?} is not a recognized repository remote")]
    InvalidRemote { url: String },
}

/// How the indexing service addresses a repository+branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub remote_kind: RemoteKind,
    /// Remote URL exactly as git reports it.
    pub remote_url: String,
    /// `owner/name` as the service spells repositories.
    pub owner_repo: String,
    /// Branch name, or a commit hash when the tree is detached.
    pub branch: String,
}

impl RepoIdentity {
    /// Derive the identity for the repository at `repo`.
    pub fn resolve(repo: &Path) -> Result<Self, IdentityError> {
        let remote_url = match git::remote_url(repo) {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                return Err(IdentityError::NoRemote {
                    path: repo.to_path_buf(),
                    source: None,
                })
            }
            Err(source) => {
                return Err(IdentityError::NoRemote {
                    path: repo.to_path_buf(),
                    source: Some(source),
                })
            }
        };

        // Validate the remote before touching the branch, so a bad remote
        // is never masked by a branch-resolution failure.
        let owner_repo = parse_owner_repo(&remote_url).ok_or_else(|| {
            IdentityError::InvalidRemote {
                url: remote_url.clone(),
            }
        })?;

        let remote_kind = RemoteKind::classify(&remote_url);
        if remote_kind == RemoteKind::Unknown {
            return Err(IdentityError::InvalidRemote { url: remote_url });
        }

        let branch = resolve_branch(repo)?;

        Ok(Self {
            remote_kind,
            remote_url,
            owner_repo,
            branch,
        })
    }
}

/// Current branch with the legacy fallbacks applied: an undeterminable
/// branch becomes `master`, a detached HEAD becomes the commit hash.
fn resolve_branch(repo: &Path) -> Result<String, IdentityError> {
    let branch = match git::current_branch(repo) {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => {
            warn!("could not determine the current branch, defaulting to {}", DEFAULT_BRANCH);
            return Ok(DEFAULT_BRANCH.to_string());
        }
        Err(err) => {
            warn!(
                "could not determine the current branch ({}), defaulting to {}",
                err, DEFAULT_BRANCH
            );
            return Ok(DEFAULT_BRANCH.to_string());
        }
    };

    if branch == "HEAD" {
        // Detached working tree: the commit hash stands in for the branch.
        return git::head_commit(repo)
            .map_err(|source| IdentityError::BranchResolution { source });
    }

    Ok(branch)
}

/// Extract `owner/repo` from a remote URL, stripping a trailing `.git`.
///
/// Understands `http(s)://host/owner/repo` and `git@host:owner/repo`
/// forms; anything else yields `None`.
pub fn parse_owner_repo(remote_url: &str) -> Option<String> {
    if remote_url.starts_with("https://") || remote_url.starts_with("http://") {
        let parts: Vec<&str> = remote_url.split('/').collect();
        if parts.len() < 2 {
            return None;
        }
        let repo = parts[parts.len() - 1];
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        let owner = parts[parts.len() - 2];
        Some(format!("{}/{}", owner, repo))
    } else if remote_url.starts_with("git@") {
        remote_url.split_once(':').map(|(_, path)| {
            path.strip_suffix(".git").unwrap_or(path).to_string()
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_remote_and_strips_git_suffix() {
        assert_eq!(
            parse_owner_repo("https://github.com/acme/widgets.git").as_deref(),
            Some("acme/widgets")
        );
        assert_eq!(
            parse_owner_repo("https://github.com/acme/widgets").as_deref(),
            Some("acme/widgets")
        );
        assert_eq!(
            parse_owner_repo("http://gitlab.com/team/tool.git").as_deref(),
            Some("team/tool")
        );
    }

    #[test]
    fn parses_ssh_remote() {
        assert_eq!(
            parse_owner_repo("git@github.com:acme/widgets.git").as_deref(),
            Some("acme/widgets")
        );
        assert_eq!(
            parse_owner_repo("git@gitlab.com:team/tool").as_deref(),
            Some("team/tool")
        );
    }

    #[test]
    fn strips_only_one_git_suffix() {
        assert_eq!(
            parse_owner_repo("git@github.com:acme/widgets.git.git").as_deref(),
            Some("acme/widgets.git")
        );
    }

    #[test]
    fn rejects_other_remote_forms() {
        assert_eq!(parse_owner_repo("file:///local/repo"), None);
        assert_eq!(parse_owner_repo("ssh://git@host/owner/repo"), None);
        assert_eq!(parse_owner_repo("git@hostwithoutcolon"), None);
        assert_eq!(parse_owner_repo(""), None);
    }

    #[test]
    fn classification_follows_fixed_priority() {
        assert_eq!(
            RemoteKind::classify("https://github.com/a/b"),
            RemoteKind::Github
        );
        assert_eq!(
            RemoteKind::classify("git@gitlab.com:a/b.git"),
            RemoteKind::Gitlab
        );
        assert_eq!(
            RemoteKind::classify("https://dev.azure.com/org/project"),
            RemoteKind::Azure
        );
        // github.com wins when several known hosts appear in one URL
        assert_eq!(
            RemoteKind::classify("https://gitlab.com/mirrors/github.com-import"),
            RemoteKind::Github
        );
    }

    #[test]
    fn classification_is_total() {
        assert_eq!(RemoteKind::classify(""), RemoteKind::Unknown);
        assert_eq!(
            RemoteKind::classify("https://example.com/a/b"),
            RemoteKind::Unknown
        );
        assert_eq!(RemoteKind::classify("not a url at all"), RemoteKind::Unknown);
    }

    #[test]
    fn remote_kind_wire_names() {
        assert_eq!(RemoteKind::Github.to_string(), "github");
        assert_eq!(RemoteKind::Gitlab.to_string(), "gitlab");
        assert_eq!(RemoteKind::Azure.to_string(), "azure");
        assert_eq!(RemoteKind::Unknown.to_string(), "unknown");
    }
}
