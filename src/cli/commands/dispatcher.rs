//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use crate::cli::args::{CheckArgs, Cli, Commands};
use crate::error::Result;
use crate::request::RequestContext;

use super::check::CheckCommand;
use super::info::InfoCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its output to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    request: RequestContext,
}

impl CommandDispatcher {
    /// Create a dispatcher for the request this process is serving, if any.
    pub fn new(request: RequestContext) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Dispatch and execute a command. No subcommand means `check`.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Check(args)) => CheckCommand::new(cli, args, &self.request).execute(out),
            Some(Commands::Info(args)) => InfoCommand::new(cli, args).execute(out),
            None => CheckCommand::new(cli, &CheckArgs::default(), &self.request).execute(out),
        }
    }
}
