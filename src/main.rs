use anyhow::Result;
use clap::Parser;

use repodex::cli::{AutouploadCommand, Cli, Commands};
use repodex::commands;
use repodex::config::Config;
use repodex::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::load()?;

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging)?;

    config.fill_tokens_from_env();
    tracing::debug!("repodex starting up");

    let cli = Cli::parse();

    match cli.command {
        Commands::Clone { url, dest } => {
            commands::clone::run(&config, &url, dest).await?;
        }
        Commands::Index { path, no_monitor } => {
            commands::index::run(&config, &path, no_monitor).await?;
        }
        Commands::Unindex { path } => {
            commands::unindex::run(&config, &path).await?;
        }
        Commands::CheckProgress { path } => {
            commands::progress::check(&config, &path).await?;
        }
        Commands::MonitorProgress { path } => {
            commands::progress::monitor(&config, &path).await?;
        }
        Commands::Query { question, path } => {
            commands::query::run(&config, &question, &path).await?;
        }
        Commands::Search { query, path } => {
            commands::search::run(&config, &query, &path).await?;
        }
        Commands::Autoupload { command } => match command {
            AutouploadCommand::List => {
                commands::autoupload::list(&config)?;
            }
            AutouploadCommand::Add { path } => {
                commands::autoupload::add(&mut config, &path)?;
            }
            AutouploadCommand::Remove { path } => {
                commands::autoupload::remove(&mut config, &path)?;
            }
        },
    }

    Ok(())
}
