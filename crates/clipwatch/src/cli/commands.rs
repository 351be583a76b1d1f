//! CLI command definitions.

use clap::{Args, Subcommand};

/// Run command arguments.
#[derive(Debug, Default, Args)]
pub struct RunCommand {
    /// Start with monitoring paused
    #[arg(long)]
    pub paused: bool,
}

/// Apply command arguments.
#[derive(Debug, Args)]
pub struct ApplyCommand {
    /// Text to run through the rewrite rules
    pub text: String,

    /// Resolve short links over the network
    #[arg(short, long)]
    pub expand: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the settings directory
    Path,
}
