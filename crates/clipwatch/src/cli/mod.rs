//! Command-line interface for clipwatch.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ApplyCommand, ConfigCommand, RunCommand};

/// clipwatch - Rewrite what you copy
///
/// Watches the clipboard in the background, masking configured words,
/// expanding short links and remapping URL domains.
#[derive(Debug, Parser)]
#[command(name = "clipwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding config.json, ng_words.json and url_mapping.json
    /// [default: current directory]
    #[arg(short, long, global = true, value_name = "DIR", env = "CLIPWATCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute [default: run]
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard and show the control menu
    Run(RunCommand),

    /// Run text through the rewrite rules and print the result
    Apply(ApplyCommand),

    /// Show the clipboard URL as a QR code
    Qr,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The command to run, `run` when none was given.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Run(RunCommand::default()))
    }
}
