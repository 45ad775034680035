//! Ask the service a natural-language question about a repository.

use anyhow::Result;
use std::path::Path;

use crate::api::ApiClient;
use crate::config::Config;
use crate::identity::RepoIdentity;

pub async fn run(config: &Config, question: &str, path: &Path) -> Result<()> {
    let path = super::absolute(path)?;
    let identity = RepoIdentity::resolve(&path)?;
    let client = ApiClient::new(&config.api)?;

    // The body is opaque text from the service; print it verbatim.
    let answer = client.query(&identity, question).await?;
    println!("{}", answer);
    Ok(())
}
