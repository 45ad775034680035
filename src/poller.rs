//! Polls indexing status until a repository is fully processed.
//!
//! The loop is unbounded by default, matching the service's behavior of
//! reporting progress until every file is handled. Callers can bound it
//! with `PollOptions::max_attempts` or stop it through the cancellation
//! token.

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, RepoStatus};
use crate::config::PollConfig;
use crate::identity::RepoIdentity;

/// Default delay between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Where the poller gets its status reports from.
///
/// `ApiClient` is the real source; tests substitute scripted fakes.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, identity: &RepoIdentity) -> Result<RepoStatus, ApiError>;
}

/// Loop bounds. Defaults preserve the legacy behavior: one fetch every
/// four seconds, forever, until completion or a fetch error.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: Option<u64>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

impl From<&PollConfig> for PollOptions {
    fn from(config: &PollConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            max_attempts: config.max_checks,
        }
    }
}

/// Ways a monitoring run can end without reaching completion.
#[derive(Error, Debug)]
pub enum PollError {
    /// The service reports zero files; there is no progress to compute.
    #[error("the service reports zero files for this repository, nothing to track")]
    NoFiles,

    #[error(transparent)]
    Fetch(#[from] ApiError),

    /// The cancellation token fired.
    #[error("progress monitoring was cancelled")]
    Cancelled,

    /// The configured attempt bound ran out before completion.
    #[error("indexing still incomplete after {attempts} status checks")]
    AttemptsExhausted { attempts: u64 },
}

/// Percentage of files processed, guarding the zero-file case instead of
/// dividing by zero.
pub fn progress_percent(files_processed: u64, num_files: u64) -> Result<f64, PollError> {
    if num_files == 0 {
        return Err(PollError::NoFiles);
    }
    Ok(files_processed as f64 / num_files as f64 * 100.0)
}

/// Drives the status loop and renders an in-place progress bar.
pub struct ProgressPoller<'a> {
    source: &'a dyn StatusSource,
    options: PollOptions,
}

impl<'a> ProgressPoller<'a> {
    pub fn with_options(source: &'a dyn StatusSource, options: PollOptions) -> Self {
        Self { source, options }
    }

    /// Poll until every file is processed, a fetch fails, the token is
    /// cancelled, or the attempt bound runs out. Returns the final status
    /// on completion.
    pub async fn run(
        &self,
        identity: &RepoIdentity,
        cancel: &CancellationToken,
    ) -> Result<RepoStatus, PollError> {
        let bar = create_progress_bar();
        let result = self.poll_loop(identity, cancel, &bar).await;
        match &result {
            Ok(_) => bar.finish(),
            Err(_) => bar.abandon(),
        }
        result
    }

    async fn poll_loop(
        &self,
        identity: &RepoIdentity,
        cancel: &CancellationToken,
        bar: &ProgressBar,
    ) -> Result<RepoStatus, PollError> {
        let mut attempts: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            let status = self.source.fetch_status(identity).await?;
            attempts += 1;

            if status.num_files == 0 {
                return Err(PollError::NoFiles);
            }

            // Lengths can grow while the service discovers files.
            bar.set_length(status.num_files);
            bar.set_position(status.files_processed.min(status.num_files));

            if status.files_processed >= status.num_files {
                return Ok(status);
            }

            if let Some(max) = self.options.max_attempts {
                if attempts >= max {
                    return Err(PollError::AttemptsExhausted { attempts });
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        }
    }
}

fn create_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] Indexing: [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}
