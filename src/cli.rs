//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Push SonarQube quality gate results to DaDaPush channels
#[derive(Parser)]
#[command(
    name = "sonar-dadapush",
    version,
    about = "Push SonarQube quality gate results to DaDaPush channels",
    long_about = "Reads a finished-analysis event from stdin, picks the project specific \
                  DaDaPush configuration and pushes the quality gate result to its channel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Process an analysis event from stdin (alias: run)
    #[command(alias = "run")]
    Notify,
    /// Show which project configuration applies to a project key
    Resolve {
        /// Project key as reported by the analysis
        project_key: String,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
