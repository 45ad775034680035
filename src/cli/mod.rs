use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repodex")]
#[command(author, version, about = "CLI client for a remote code-indexing and semantic search service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone a repository and submit it for indexing
    Clone {
        /// Remote URL to clone
        url: String,

        /// Destination directory (defaults to the repository name)
        dest: Option<PathBuf>,
    },

    /// Submit a repository for indexing and monitor progress
    Index {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Submit only, without monitoring progress afterwards
        #[arg(long)]
        no_monitor: bool,
    },

    /// Remove a repository from the index
    Unindex {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the current indexing progress once
    CheckProgress {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Follow indexing progress until completion
    MonitorProgress {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Ask a natural-language question about a repository
    Query {
        /// The question to ask
        question: String,

        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Search a repository in natural language
    Search {
        /// Search query
        query: String,

        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Manage directories flagged for automatic indexing
    Autoupload {
        #[command(subcommand)]
        command: AutouploadCommand,
    },
}

/// Subcommands for the autoupload registry.
#[derive(Subcommand)]
pub enum AutouploadCommand {
    /// List flagged directories
    List,

    /// Flag a directory for automatic indexing
    Add {
        /// Directory to flag
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Unflag a directory
    Remove {
        /// Directory to unflag
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn index_path_defaults_to_the_current_directory() {
        let cli = Cli::parse_from(["repodex", "index"]);
        match cli.command {
            Commands::Index { path, no_monitor } => {
                assert_eq!(path, PathBuf::from("."));
                assert!(!no_monitor);
            }
            _ => panic!("expected the index command"),
        }
    }

    #[test]
    fn subcommands_are_kebab_case() {
        let cli = Cli::parse_from(["repodex", "check-progress", "/tmp/repo"]);
        match cli.command {
            Commands::CheckProgress { path } => assert_eq!(path, PathBuf::from("/tmp/repo")),
            _ => panic!("expected the check-progress command"),
        }
    }

    #[test]
    fn autoupload_group_parses() {
        let cli = Cli::parse_from(["repodex", "autoupload", "add", "/home/dev/widgets"]);
        match cli.command {
            Commands::Autoupload {
                command: AutouploadCommand::Add { path },
            } => assert_eq!(path, PathBuf::from("/home/dev/widgets")),
            _ => panic!("expected autoupload add"),
        }
    }
}
