//! Command-line interface

pub mod output;

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Storage account management walkthrough
#[derive(Debug, Parser, Clone)]
#[command(name = "armstor")]
#[command(version = "0.1.0")]
#[command(about = "Runs a storage account management walkthrough", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a YAML profile with identity settings
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the ten-step walkthrough against the management API
    Run(RunCommand),

    /// Validate the resolved settings without calling any service
    CheckConfig(CheckConfigCommand),
}

#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Abort the whole run after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Region for the created resources (overrides profile/default)
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CheckConfigCommand {
    /// Print the resolved non-secret settings as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
