//! Fact registry.
//!
//! Maps fact names to zero-argument evaluators. The registry is an ordinary
//! value owned by the host; nothing is registered globally.

use std::collections::BTreeMap;

use super::probe::{PackagePresenceProbe, MYSQL_CLIENT_FACT};
use super::result::ProbeResult;
use crate::config::FactsConfig;
use crate::error::Result;

/// Something that can be evaluated into a fact value.
///
/// Implemented for every `Fn() -> ProbeResult` closure, so a host can
/// register plain functions as well as probes.
pub trait Fact: Send + Sync {
    /// Evaluate the fact. Must not panic or fail; undetermined is `Absent`.
    fn resolve(&self) -> ProbeResult;
}

impl<F> Fact for F
where
    F: Fn() -> ProbeResult + Send + Sync,
{
    fn resolve(&self) -> ProbeResult {
        self()
    }
}

impl Fact for PackagePresenceProbe {
    fn resolve(&self) -> ProbeResult {
        self.probe()
    }
}

/// Registry of named facts.
pub struct FactRegistry {
    facts: BTreeMap<String, Box<dyn Fact>>,
}

impl FactRegistry {
    /// Create a registry with the built-in facts.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(MYSQL_CLIENT_FACT, PackagePresenceProbe::mysql_client());
        registry
    }

    /// Create a registry with no facts.
    pub fn empty() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }

    /// Add or override package facts from config.
    pub fn with_config(mut self, config: &FactsConfig) -> Result<Self> {
        for (name, def) in &config.facts {
            let fact = def.build_fact(name)?;
            tracing::debug!("Registering configured fact '{}'", name);
            self.register_boxed(name, fact);
        }
        Ok(self)
    }

    /// Register a fact under `name`, replacing any existing one.
    pub fn register<F: Fact + 'static>(&mut self, name: &str, fact: F) {
        self.register_boxed(name, Box::new(fact));
    }

    /// Register an already boxed fact under `name`, replacing any existing one.
    pub fn register_boxed(&mut self, name: &str, fact: Box<dyn Fact>) {
        self.facts.insert(name.to_string(), fact);
    }

    /// Whether a fact with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Evaluate one fact. `None` if the name is not registered.
    pub fn resolve(&self, name: &str) -> Option<ProbeResult> {
        self.facts.get(name).map(|fact| fact.resolve())
    }

    /// Evaluate every registered fact, in name order.
    pub fn resolve_all(&self) -> BTreeMap<String, ProbeResult> {
        self.facts
            .iter()
            .map(|(name, fact)| (name.clone(), fact.resolve()))
            .collect()
    }

    /// Registered fact names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.facts.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Default for FactRegistry {
    fn default() -> Self {
        Self::new()
    }
}
