pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod git;
pub mod identity;
pub mod logging;
pub mod poller;

pub use config::Config;
pub use identity::{RemoteKind, RepoIdentity};
