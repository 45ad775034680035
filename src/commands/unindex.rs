//! Remove a repository from the index.
//!
//! The service's delete contract is not published yet, so this surfaces
//! the client's explicit not-implemented error instead of pretending the
//! repository was removed.

use anyhow::Result;
use std::path::Path;

use crate::api::ApiClient;
use crate::config::Config;

pub async fn run(config: &Config, path: &Path) -> Result<()> {
    let path = super::absolute(path)?;
    let client = ApiClient::new(&config.api)?;
    client.remove_from_index(&path).await?;
    Ok(())
}
