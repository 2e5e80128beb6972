//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// ssreqcheck - Check that a server can run a PHP application.
#[derive(Debug, Parser)]
#[command(name = "ssreqcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// PHP binary to inspect
    #[arg(long, global = true, env = "SSREQCHECK_PHP", default_value = "php")]
    pub php: PathBuf,

    /// Requirements file overriding the default thresholds
    #[arg(short, long, global = true, env = "SSREQCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for PHP, helper commands and the rewrite probe
    #[arg(long, global = true, default_value_t = 5)]
    pub timeout: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check the environment and print the report (default)
    Check(CheckArgs),

    /// Print the parsed phpinfo() dump as JSON
    Info(InfoArgs),
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// HTML when serving a request, text otherwise
    #[default]
    Auto,
    /// Plain text
    Text,
    /// HTML page
    Html,
    /// JSON document
    Json,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Auto)]
    pub format: ReportFormat,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Only print this section (case-insensitive)
    #[arg(short, long)]
    pub section: Option<String>,
}
