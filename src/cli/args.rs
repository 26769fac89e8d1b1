//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// pkgfact - Package presence facts for configuration management.
#[derive(Debug, Parser)]
#[command(name = "pkgfact")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to fact config (overrides /etc/pkgfact/facts.yml)
    #[arg(short, long, global = true, env = "PKGFACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Arguments for resolving facts when no subcommand is given
    #[command(flatten)]
    pub resolve: ResolveArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve facts and print their values (default if no command specified)
    Resolve(ResolveArgs),

    /// List registered fact names
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Facts to resolve (all registered facts if omitted)
    #[arg(value_name = "FACT")]
    pub facts: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_resolves_all() {
        let cli = Cli::parse_from(["pkgfact"]);
        assert!(cli.command.is_none());
        assert!(cli.resolve.facts.is_empty());
        assert!(!cli.resolve.json);
    }

    #[test]
    fn bare_fact_names_are_positional() {
        let cli = Cli::parse_from(["pkgfact", "has_installed_mysql_client", "--json"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.resolve.facts, vec!["has_installed_mysql_client"]);
        assert!(cli.resolve.json);
    }

    #[test]
    fn resolve_subcommand_parses() {
        let cli = Cli::parse_from(["pkgfact", "resolve", "a", "b"]);
        if let Some(Commands::Resolve(args)) = cli.command {
            assert_eq!(args.facts, vec!["a", "b"]);
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn list_subcommand_parses() {
        let cli = Cli::parse_from(["pkgfact", "list", "--json"]);
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true }))));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["pkgfact", "list", "--config", "/tmp/facts.yml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/facts.yml")));
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["pkgfact", "completions"]).is_err());
        let cli = Cli::parse_from(["pkgfact", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions(_))));
    }
}
