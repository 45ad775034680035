//! Single status checks and the monitoring loop.

use anyhow::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::Config;
use crate::identity::RepoIdentity;
use crate::poller::{progress_percent, PollOptions, ProgressPoller};

/// Fetch and print the indexing status once.
pub async fn check(config: &Config, path: &Path) -> Result<()> {
    let path = super::absolute(path)?;
    let identity = RepoIdentity::resolve(&path)?;
    let client = ApiClient::new(&config.api)?;

    let status = client.fetch_status(&identity).await?;
    let percent = progress_percent(status.files_processed, status.num_files)?;
    println!(
        "Files processed: {}/{} ({:.2}%)",
        status.files_processed, status.num_files, percent
    );
    println!("Status: {}", status.status);
    Ok(())
}

/// Poll until indexing completes. Ctrl-C cancels cooperatively.
pub async fn monitor(config: &Config, path: &Path) -> Result<()> {
    let path = super::absolute(path)?;
    let identity = RepoIdentity::resolve(&path)?;
    let client = ApiClient::new(&config.api)?;
    monitor_identity(&client, &identity, PollOptions::from(&config.poll)).await
}

/// Monitoring loop for an already-resolved identity, shared with the
/// index command's default monitoring phase.
pub(crate) async fn monitor_identity(
    client: &ApiClient,
    identity: &RepoIdentity,
    options: PollOptions,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let poller = ProgressPoller::with_options(client, options);
    let status = poller.run(identity, &cancel).await?;

    println!(
        "Indexing complete: {}/{} files ({})",
        status.files_processed, status.num_files, status.status
    );
    Ok(())
}
