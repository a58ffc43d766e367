//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - simulate: run an activity against a scenario file
//! - list: list available activities
//! - rules: show an activity's outcome rules
//! - config: show the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Macroloop - repetitive in-game activities as one controlled loop
#[derive(Parser, Debug)]
#[command(name = "macroloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an activity against a scripted scenario
    Simulate {
        /// Activity name (see `list`)
        activity: String,

        /// Scenario YAML file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Stop after this many iterations
        #[arg(short = 'n', long)]
        max_iterations: Option<u64>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available activities
    List,

    /// Show an activity's outcome rules in priority order
    Rules {
        /// Activity name
        activity: String,
    },

    /// Print the effective configuration
    Config,
}
