//! Configuration file discovery and loading.

use crate::config::schema::FactsConfig;
use crate::error::{FactError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// System-wide config read when no path is given explicitly.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pkgfact/facts.yml";

/// Pick the config file to load.
///
/// An explicit path always wins, whether or not it exists, so a typo
/// surfaces as `ConfigNotFound`. Otherwise the first existing candidate is
/// used.
pub fn discover_config(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Default discovery candidates.
pub fn default_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from(SYSTEM_CONFIG_PATH)]
}

/// Load a single config file and parse it into FactsConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<FactsConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FactError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            FactError::Io(e)
        }
    })?;

    tracing::debug!("Loaded fact config from {}", path.display());
    parse_config(&content, path)
}

/// Parse YAML content into FactsConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<FactsConfig> {
    if content.trim().is_empty() {
        return Ok(FactsConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| FactError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discover and load config, if any.
///
/// Returns an empty config when nothing was given and no candidate exists.
pub fn load_config(explicit: Option<&Path>) -> Result<FactsConfig> {
    match discover_config(explicit, &default_candidates()) {
        Some(path) => load_config_file(&path),
        None => Ok(FactsConfig::default()),
    }
}
