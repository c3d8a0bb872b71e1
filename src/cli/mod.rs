use clap::{Parser, Subcommand};

use crate::settings::PackageManager;

#[derive(Parser)]
#[command(name = "aiup")]
#[command(author, version, about = "Cross-platform CLI for checking and updating AI coding assistants")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all supported tools with installed version and update status
    List,

    /// Check installed and latest version of one tool
    Check {
        /// Tool to check (defaults to the configured default tool)
        #[arg(short, long)]
        tool: Option<String>,
    },

    /// Update a tool, or every outdated tool
    Update {
        /// Tool to update (defaults to the configured default tool)
        #[arg(short, long, conflicts_with = "all")]
        tool: Option<String>,

        /// Update all tools that are currently outdated
        #[arg(long)]
        all: bool,
    },

    /// Show or change persisted settings
    Config {
        /// Tool used when check/update is run without --tool
        #[arg(long)]
        default_tool: Option<String>,

        /// Package manager for registry queries and global installs
        #[arg(long, value_enum)]
        package_manager: Option<PackageManager>,

        /// Accept raw probe output as a version when no semver is found
        #[arg(long)]
        raw_version_fallback: Option<bool>,
    },
}
