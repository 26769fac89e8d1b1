//! Fact configuration schema.
//!
//! ```yaml
//! facts:
//!   has_installed_mysql_client:
//!     capability: mysql-client
//!     manager: rpm
//!     timeout_secs: 10
//!   has_installed_psql:
//!     capability: postgresql
//!     manager: custom
//!     command: ["rpm", "-q", "--whatprovides", "{capability}"]
//!     not_found_pattern: "^no package provides"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::error::{FactError, Result};
use crate::facts::{Fact, NotFoundMatcher, PackagePresenceProbe, ProbeResult};
use crate::query::{PackageManager, QueryCommand, SystemRunner};

/// Root of a fact config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    /// Package facts keyed by fact name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facts: BTreeMap<String, PackageFactConfig>,
}

/// Which package manager a configured fact queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerSetting {
    #[default]
    Rpm,
    Dpkg,
    Pacman,
    /// Detect from what is installed, falling back to rpm.
    Auto,
    /// Use `command` verbatim.
    Custom,
}

/// Detects the local package manager for `manager: auto`.
type Detector = fn() -> PackageManager;

impl ManagerSetting {
    /// Resolve to a concrete manager, calling `detect` only for `Auto`.
    /// `None` for `Custom`.
    fn resolve_with(&self, detect: Detector) -> Option<PackageManager> {
        match self {
            ManagerSetting::Rpm => Some(PackageManager::Rpm),
            ManagerSetting::Dpkg => Some(PackageManager::Dpkg),
            ManagerSetting::Pacman => Some(PackageManager::Pacman),
            ManagerSetting::Auto => Some(detect()),
            ManagerSetting::Custom => None,
        }
    }
}

/// A single package presence fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageFactConfig {
    /// Capability or package name to query.
    pub capability: String,

    #[serde(default)]
    pub manager: ManagerSetting,

    /// Query argv; `{capability}` is substituted. Required for `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    /// Regex marking a negative answer. Defaults to the manager's phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found_pattern: Option<String>,

    /// Kill the query after this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl PackageFactConfig {
    /// Build the fact described by this entry.
    ///
    /// Entries are validated here. For `manager: auto` the package manager is
    /// detected on first resolve, so building a registry spawns nothing.
    pub fn build_fact(&self, fact: &str) -> Result<Box<dyn Fact>> {
        self.build_fact_with(fact, PackageManager::detect)
    }

    fn build_fact_with(&self, fact: &str, detect: Detector) -> Result<Box<dyn Fact>> {
        if self.manager != ManagerSetting::Auto {
            let probe = self.build_probe(fact, detect)?;
            tracing::debug!("Built fact '{}': {:?}", fact, probe);
            return Ok(Box::new(probe));
        }

        // Every setting except the manager is checked against rpm up front.
        self.build_probe(fact, || PackageManager::Rpm)?;
        tracing::debug!("Built fact '{}' with deferred manager detection", fact);
        Ok(Box::new(DetectOnResolve {
            fact: fact.to_string(),
            config: self.clone(),
            detect,
            probe: OnceLock::new(),
        }))
    }

    fn build_probe(&self, fact: &str, detect: Detector) -> Result<PackagePresenceProbe> {
        let invalid = |message: &str| FactError::InvalidFact {
            fact: fact.to_string(),
            message: message.to_string(),
        };

        if self.capability.trim().is_empty() {
            return Err(invalid("capability must not be empty"));
        }

        let manager = self.manager.resolve_with(detect);
        let mut probe = match manager {
            Some(manager) => PackagePresenceProbe::for_manager(manager, &self.capability),
            None if self.command.is_none() => {
                return Err(invalid("manager 'custom' requires a command"));
            }
            None => PackagePresenceProbe::new(&self.capability),
        };

        if let Some(argv) = &self.command {
            let command = QueryCommand::from_template(argv, &self.capability)
                .ok_or_else(|| invalid("command must not be empty"))?;
            probe = probe.with_command(command);
        }

        if let Some(pattern) = &self.not_found_pattern {
            let matcher = NotFoundMatcher::pattern(pattern)
                .map_err(|e| invalid(&format!("invalid not_found_pattern: {}", e)))?;
            probe = probe.with_not_found(matcher);
        }

        match self.timeout_secs {
            Some(0) => return Err(invalid("timeout_secs must be greater than 0")),
            Some(secs) => {
                let runner = SystemRunner::new().with_timeout(Duration::from_secs(secs));
                probe = probe.with_runner(Arc::new(runner));
            }
            None => {}
        }

        Ok(probe)
    }
}

/// A configured fact whose package manager is detected on first resolve.
struct DetectOnResolve {
    fact: String,
    config: PackageFactConfig,
    detect: Detector,
    probe: OnceLock<Option<PackagePresenceProbe>>,
}

impl Fact for DetectOnResolve {
    fn resolve(&self) -> ProbeResult {
        let probe = self.probe.get_or_init(|| {
            match self.config.build_probe(&self.fact, self.detect) {
                Ok(probe) => Some(probe),
                Err(e) => {
                    tracing::debug!("Fact '{}' could not be built: {}", self.fact, e);
                    None
                }
            }
        });
        probe.as_ref().map_or(ProbeResult::Absent, |p| p.probe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fact(yaml: &str) -> PackageFactConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn probe(def: &PackageFactConfig) -> Result<PackagePresenceProbe> {
        def.build_probe("mysql", PackageManager::detect)
    }

    #[test]
    fn minimal_fact_defaults_to_rpm() {
        let def = fact("capability: mysql-client");
        assert_eq!(def.manager, ManagerSetting::Rpm);

        let probe = probe(&def).unwrap();
        assert_eq!(probe.command().to_string(), "rpm -q --whatprovides mysql-client");
    }

    #[test]
    fn dpkg_manager_builds_dpkg_query() {
        let def = fact("capability: default-mysql-client\nmanager: dpkg");
        let probe = probe(&def).unwrap();
        assert_eq!(probe.command().program(), "dpkg-query");
    }

    #[test]
    fn custom_command_substitutes_capability() {
        let def = fact(
            r#"
capability: mysql-client
manager: custom
command: ["zypper", "search", "--installed-only", "--provides", "{capability}"]
not_found_pattern: "^No matching items"
"#,
        );
        let probe = probe(&def).unwrap();
        assert_eq!(
            probe.command().to_string(),
            "zypper search --installed-only --provides mysql-client"
        );
    }

    #[test]
    fn custom_without_command_is_invalid() {
        let def = fact("capability: mysql-client\nmanager: custom");
        let err = probe(&def).unwrap_err();
        assert!(err.to_string().contains("requires a command"));
    }

    #[test]
    fn empty_command_is_invalid() {
        let def = fact("capability: mysql-client\ncommand: []");
        assert!(matches!(
            probe(&def),
            Err(FactError::InvalidFact { .. })
        ));
    }

    #[test]
    fn empty_capability_is_invalid() {
        let def = fact("capability: '  '");
        assert!(probe(&def).is_err());
    }

    #[test]
    fn bad_pattern_is_invalid() {
        let def = fact("capability: mysql-client\nnot_found_pattern: '(unclosed'");
        let err = probe(&def).unwrap_err();
        assert!(err.to_string().contains("not_found_pattern"));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let def = fact("capability: mysql-client\ntimeout_secs: 0");
        assert!(probe(&def).is_err());
    }

    #[test]
    fn unknown_manager_fails_to_parse() {
        let result: std::result::Result<PackageFactConfig, _> =
            serde_yaml::from_str("capability: x\nmanager: apt");
        assert!(result.is_err());
    }

    #[test]
    fn custom_resolves_to_no_manager() {
        assert!(ManagerSetting::Custom.resolve_with(PackageManager::detect).is_none());
        assert_eq!(
            ManagerSetting::Pacman.resolve_with(PackageManager::detect),
            Some(PackageManager::Pacman)
        );
    }

    static DETECTIONS: AtomicUsize = AtomicUsize::new(0);

    fn counting_detect() -> PackageManager {
        DETECTIONS.fetch_add(1, Ordering::SeqCst);
        PackageManager::Pacman
    }

    #[test]
    fn auto_manager_detects_on_first_resolve_only() {
        let def = fact(
            "capability: this-capability-does-not-exist-12345\nmanager: auto\ntimeout_secs: 5",
        );

        let built = def.build_fact_with("mysql", counting_detect).unwrap();
        assert_eq!(DETECTIONS.load(Ordering::SeqCst), 0);

        built.resolve();
        built.resolve();
        assert_eq!(DETECTIONS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn auto_manager_still_validates_up_front() {
        fn never() -> PackageManager {
            panic!("detection must not run while building");
        }

        let def = fact("capability: mysql-client\nmanager: auto\nnot_found_pattern: '(unclosed'");
        assert!(def.build_fact_with("mysql", never).is_err());

        let def = fact("capability: mysql-client\nmanager: auto");
        assert!(def.build_fact_with("mysql", never).is_ok());
    }
}
