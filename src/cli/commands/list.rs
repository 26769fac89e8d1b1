//! List command implementation.
//!
//! The `pkgfact list` command lists registered fact names without
//! evaluating them.

use std::io::Write;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::facts::FactRegistry;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand<'a> {
    registry: &'a FactRegistry,
    args: ListArgs,
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(registry: &'a FactRegistry, args: ListArgs) -> Self {
        Self { registry, args }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let names = self.registry.names();

        if self.args.json {
            let json = serde_json::to_string_pretty(&names).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
        } else {
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }

        Ok(CommandResult::success())
    }
}
