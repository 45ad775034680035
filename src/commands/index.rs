//! Submit a repository for indexing and, by default, monitor progress.

use anyhow::{bail, Result};
use std::path::Path;

use crate::api::ApiClient;
use crate::config::Config;
use crate::identity::RepoIdentity;
use crate::poller::PollOptions;

pub async fn run(config: &Config, path: &Path, no_monitor: bool) -> Result<()> {
    let path = super::absolute(path)?;
    if !path.join(".git").exists() {
        bail!(
            "{} is not a git repository. Clone one first or pass the path to a working tree.",
            path.display()
        );
    }

    let identity = RepoIdentity::resolve(&path)?;
    let client = ApiClient::new(&config.api)?;
    client.submit_for_indexing(&identity).await?;
    println!(
        "Submitted {} (branch {}) for indexing.",
        identity.owner_repo, identity.branch
    );

    if no_monitor {
        return Ok(());
    }

    // Give the service one interval to register the job before polling.
    let options = PollOptions::from(&config.poll);
    tokio::time::sleep(options.interval).await;
    super::progress::monitor_identity(&client, &identity, options).await
}
