//! Resolve command implementation.
//!
//! The `pkgfact resolve` command evaluates facts and prints them the way a
//! fact host does:
//!
//! - one requested fact: just its value
//! - several requested facts: `name => value` per line, absent ones empty
//! - no facts requested: `name => value` for every fact that resolved `true`

use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::args::ResolveArgs;
use crate::error::{FactError, Result};
use crate::facts::{FactRegistry, ProbeResult};

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand<'a> {
    registry: &'a FactRegistry,
    args: ResolveArgs,
}

impl<'a> ResolveCommand<'a> {
    /// Create a new resolve command.
    pub fn new(registry: &'a FactRegistry, args: ResolveArgs) -> Self {
        Self { registry, args }
    }

    fn resolve(&self) -> Result<BTreeMap<String, ProbeResult>> {
        if self.args.facts.is_empty() {
            return Ok(self.registry.resolve_all());
        }

        let mut values = BTreeMap::new();
        for name in &self.args.facts {
            let value = self
                .registry
                .resolve(name)
                .ok_or_else(|| FactError::UnknownFact { name: name.clone() })?;
            values.insert(name.clone(), value);
        }
        Ok(values)
    }
}

impl Command for ResolveCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let values = self.resolve()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&values).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
            return Ok(CommandResult::success());
        }

        match self.args.facts.as_slice() {
            [single] => {
                writeln!(out, "{}", values[single])?;
            }
            [] => {
                for (name, value) in values.iter().filter(|(_, v)| v.is_true()) {
                    writeln!(out, "{} => {}", name, value)?;
                }
            }
            _ => {
                for (name, value) in &values {
                    writeln!(out, "{} => {}", name, value)?;
                }
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FactRegistry {
        let mut registry = FactRegistry::empty();
        registry.register("has_installed_mysql_client", || ProbeResult::True);
        registry.register("has_installed_psql", || ProbeResult::Absent);
        registry
    }

    fn run(registry: &FactRegistry, facts: &[&str], json: bool) -> Result<String> {
        let args = ResolveArgs {
            facts: facts.iter().map(|s| s.to_string()).collect(),
            json,
        };
        let mut out = Vec::new();
        ResolveCommand::new(registry, args).execute(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn all_facts_prints_only_true() {
        let output = run(&registry(), &[], false).unwrap();
        assert_eq!(output, "has_installed_mysql_client => true\n");
    }

    #[test]
    fn single_fact_prints_bare_value() {
        let registry = registry();
        assert_eq!(run(&registry, &["has_installed_mysql_client"], false).unwrap(), "true\n");
        assert_eq!(run(&registry, &["has_installed_psql"], false).unwrap(), "\n");
    }

    #[test]
    fn several_facts_print_absent_as_empty() {
        let output = run(
            &registry(),
            &["has_installed_psql", "has_installed_mysql_client"],
            false,
        )
        .unwrap();
        assert_eq!(
            output,
            "has_installed_mysql_client => true\nhas_installed_psql => \n"
        );
    }

    #[test]
    fn json_maps_absent_to_null() {
        let output = run(&registry(), &[], true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["has_installed_mysql_client"], serde_json::Value::Bool(true));
        assert!(parsed["has_installed_psql"].is_null());
    }

    #[test]
    fn unknown_fact_is_error() {
        let err = run(&registry(), &["nonexistent"], false).unwrap_err();
        assert!(matches!(err, FactError::UnknownFact { .. }));
    }
}
