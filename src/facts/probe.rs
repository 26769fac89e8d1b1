//! Package presence probe.
//!
//! The probe asks the package manager whether anything installed provides a
//! capability and reduces the answer to a [`ProbeResult`]:
//!
//! - exit status 0 and output not starting with the manager's negative
//!   phrase: `True`
//! - anything else, including a query that could not run at all: `Absent`
//!
//! # Example
//!
//! ```
//! use pkgfact::facts::{PackagePresenceProbe, ProbeResult};
//! use pkgfact::query::QueryOutput;
//!
//! let probe = PackagePresenceProbe::new("mysql-client");
//! let output = QueryOutput::new(Some(0), "mysql-libs-5.7.0-1.el7.x86_64\n");
//! assert_eq!(probe.evaluate(&output), ProbeResult::True);
//! ```

use regex::Regex;
use std::sync::Arc;

use super::result::ProbeResult;
use crate::query::{PackageManager, QueryCommand, QueryOutput, QueryRunner, SystemRunner};

/// Fact name under which MySQL client presence is reported.
pub const MYSQL_CLIENT_FACT: &str = "has_installed_mysql_client";

/// Virtual package queried for the MySQL client fact.
pub const MYSQL_CLIENT_CAPABILITY: &str = "mysql-client";

/// How a negative answer is recognized in query output.
#[derive(Debug, Clone)]
pub enum NotFoundMatcher {
    /// Output begins with this exact, case-sensitive phrase.
    Prefix(String),
    /// Output does not begin with this phrase.
    UnlessPrefix(String),
    /// Output matches this user-supplied regex.
    Pattern(Regex),
}

impl From<PackageManager> for NotFoundMatcher {
    fn from(manager: PackageManager) -> Self {
        match manager {
            PackageManager::Rpm => NotFoundMatcher::Prefix("no package provides".to_string()),
            // Status abbreviation: desired "install", current "installed".
            PackageManager::Dpkg => NotFoundMatcher::UnlessPrefix("ii".to_string()),
            PackageManager::Pacman => NotFoundMatcher::Prefix("error: ".to_string()),
        }
    }
}

impl NotFoundMatcher {
    /// Compile a regex matcher.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(NotFoundMatcher::Pattern)
    }

    /// Whether `text` is a negative answer.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            NotFoundMatcher::Prefix(prefix) => text.starts_with(prefix.as_str()),
            NotFoundMatcher::UnlessPrefix(prefix) => !text.starts_with(prefix.as_str()),
            NotFoundMatcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// Determines whether a package providing a capability is installed.
#[derive(Clone)]
pub struct PackagePresenceProbe {
    capability: String,
    command: QueryCommand,
    not_found: NotFoundMatcher,
    runner: Arc<dyn QueryRunner>,
}

impl PackagePresenceProbe {
    /// Probe for `capability` with `rpm -q --whatprovides`.
    pub fn new(capability: &str) -> Self {
        Self::for_manager(PackageManager::Rpm, capability)
    }

    /// Probe for `capability` using a specific manager's query syntax.
    pub fn for_manager(manager: PackageManager, capability: &str) -> Self {
        Self {
            capability: capability.to_string(),
            command: manager.query(capability),
            not_found: NotFoundMatcher::from(manager),
            runner: Arc::new(SystemRunner::new()),
        }
    }

    /// The built-in `has_installed_mysql_client` probe.
    pub fn mysql_client() -> Self {
        Self::new(MYSQL_CLIENT_CAPABILITY)
    }

    /// Replace the query command.
    pub fn with_command(mut self, command: QueryCommand) -> Self {
        self.command = command;
        self
    }

    /// Replace how negative answers are recognized.
    pub fn with_not_found(mut self, matcher: NotFoundMatcher) -> Self {
        self.not_found = matcher;
        self
    }

    /// Replace the runner that executes the query.
    pub fn with_runner(mut self, runner: Arc<dyn QueryRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn command(&self) -> &QueryCommand {
        &self.command
    }

    /// Run the query and interpret it.
    ///
    /// Never fails: a query that cannot be spawned or times out is `Absent`.
    pub fn probe(&self) -> ProbeResult {
        match self.runner.run(&self.command) {
            Ok(output) => {
                let result = self.evaluate(&output);
                tracing::debug!(
                    "Probe for '{}' via '{}' resolved to {:?}",
                    self.capability,
                    self.command,
                    result
                );
                result
            }
            Err(e) => {
                tracing::debug!("Probe for '{}' could not run: {}", self.capability, e);
                ProbeResult::Absent
            }
        }
    }

    /// Interpret a finished query. Depends only on exit code and stdout.
    pub fn evaluate(&self, output: &QueryOutput) -> ProbeResult {
        let text = output.stdout.trim_start();
        ProbeResult::from(output.exited_zero() && !self.not_found.matches(text))
    }
}

impl std::fmt::Debug for PackagePresenceProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackagePresenceProbe")
            .field("capability", &self.capability)
            .field("command", &self.command)
            .field("not_found", &self.not_found)
            .finish_non_exhaustive()
    }
}

/// Probe for `package_name` with the default rpm query.
pub fn probe(package_name: &str) -> ProbeResult {
    PackagePresenceProbe::new(package_name).probe()
}
