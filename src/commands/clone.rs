//! Clone a repository and submit the fresh clone for indexing.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::Config;
use crate::git;
use crate::identity::{parse_owner_repo, RepoIdentity};

pub async fn run(config: &Config, url: &str, dest: Option<PathBuf>) -> Result<()> {
    let dest = match dest {
        Some(dest) => dest,
        None => default_dest(url)?,
    };

    println!("Cloning {} into {}...", url, dest.display());
    git::clone(url, &dest)?;

    let identity = RepoIdentity::resolve(&dest)?;
    let client = ApiClient::new(&config.api)?;
    client.submit_for_indexing(&identity).await?;

    println!(
        "Submitted {} (branch {}) for indexing.",
        identity.owner_repo, identity.branch
    );
    println!(
        "Run `repodex monitor-progress {}` to follow along.",
        dest.display()
    );
    Ok(())
}

/// Clone destination derived from the URL: the repository name with any
/// `.git` suffix already stripped by the parse.
fn default_dest(url: &str) -> Result<PathBuf> {
    let owner_repo = parse_owner_repo(url)
        .with_context(|| format!("Cannot derive a directory name from {:?}", url))?;
    let name = owner_repo
        .rsplit_once('/')
        .map(|(_, name)| name.to_string())
        .unwrap_or(owner_repo);
    Ok(PathBuf::from(name))
}
