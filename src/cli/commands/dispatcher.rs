//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::config::load_config;
use crate::error::Result;
use crate::facts::FactRegistry;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing results to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }

    /// Exit code as a process status. Codes outside `0..=255` become 1.
    pub fn exit_status(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher reading facts from `config_path`, if given.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Build the registry: built-in facts plus whatever config adds.
    pub fn registry(&self) -> Result<FactRegistry> {
        let config = load_config(self.config_path.as_deref())?;
        FactRegistry::new().with_config(&config)
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Resolve(args)) => {
                let registry = self.registry()?;
                super::resolve::ResolveCommand::new(&registry, args.clone()).execute(out)
            }
            Some(Commands::List(args)) => {
                let registry = self.registry()?;
                super::list::ListCommand::new(&registry, args.clone()).execute(out)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(out)
            }
            None => {
                let registry = self.registry()?;
                super::resolve::ResolveCommand::new(&registry, cli.resolve.clone()).execute(out)
            }
        }
    }
}
