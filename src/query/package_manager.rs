//! Package manager query syntax.
//!
//! Each supported manager knows how to ask "is anything installed that
//! provides this capability?". How the answer is read lives with the probe.

use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};

use super::command::QueryCommand;

/// A system package manager that can answer presence queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// RPM-based systems (RHEL, Fedora, SUSE).
    #[default]
    Rpm,
    /// Debian-based systems. Matches package names, not virtual capabilities.
    ///
    /// Queries the status abbreviation, since `dpkg-query -W` also succeeds
    /// for removed packages that left config files behind.
    Dpkg,
    /// Arch-based systems. `pacman -T` resolves provides.
    Pacman,
}

impl PackageManager {
    /// All managers in detection order.
    pub const ALL: [PackageManager; 3] = [
        PackageManager::Rpm,
        PackageManager::Dpkg,
        PackageManager::Pacman,
    ];

    /// Executable used for queries.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Rpm => "rpm",
            PackageManager::Dpkg => "dpkg-query",
            PackageManager::Pacman => "pacman",
        }
    }

    /// Arguments that precede the capability name.
    fn query_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Rpm => &["-q", "--whatprovides"],
            PackageManager::Dpkg => &["-W", "-f", "${db:Status-Abbrev}"],
            PackageManager::Pacman => &["-T"],
        }
    }

    /// Build the presence query for a capability.
    pub fn query(&self, capability: &str) -> QueryCommand {
        let mut args: Vec<String> = self.query_args().iter().map(|s| s.to_string()).collect();
        args.push(capability.to_string());
        QueryCommand::new(self.program(), args)
    }

    /// Detect the local package manager, defaulting to RPM.
    pub fn detect() -> Self {
        Self::detect_with(program_available)
    }

    /// Detect using a custom availability check.
    ///
    /// This allows testing without depending on what the host has installed.
    pub fn detect_with<F>(available: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let detected = Self::ALL
            .into_iter()
            .find(|manager| available(manager.program()));
        match detected {
            Some(manager) => {
                tracing::debug!("Detected package manager: {}", manager.program());
                manager
            }
            None => {
                tracing::debug!("No package manager detected, falling back to rpm");
                PackageManager::Rpm
            }
        }
    }
}

/// Check whether `program --version` runs successfully.
fn program_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpm_query_uses_whatprovides() {
        let cmd = PackageManager::Rpm.query("mysql-client");
        assert_eq!(cmd.to_string(), "rpm -q --whatprovides mysql-client");
    }

    #[test]
    fn dpkg_query_shows_status_abbrev() {
        let cmd = PackageManager::Dpkg.query("default-mysql-client");
        assert_eq!(cmd.program(), "dpkg-query");
        assert_eq!(
            cmd.args(),
            ["-W", "-f", "${db:Status-Abbrev}", "default-mysql-client"]
        );
    }

    #[test]
    fn pacman_query_uses_deptest() {
        let cmd = PackageManager::Pacman.query("mariadb-clients");
        assert_eq!(cmd.to_string(), "pacman -T mariadb-clients");
    }

    #[test]
    fn default_is_rpm() {
        assert_eq!(PackageManager::default(), PackageManager::Rpm);
    }

    #[test]
    fn detect_with_prefers_first_available() {
        let manager = PackageManager::detect_with(|p| p == "dpkg-query" || p == "pacman");
        assert_eq!(manager, PackageManager::Dpkg);
    }

    #[test]
    fn detect_with_nothing_available_falls_back_to_rpm() {
        let manager = PackageManager::detect_with(|_| false);
        assert_eq!(manager, PackageManager::Rpm);
    }

    #[test]
    fn program_available_false_for_missing_binary() {
        assert!(!program_available("this-command-does-not-exist-12345"));
    }

    #[test]
    fn deserializes_lowercase_names() {
        let manager: PackageManager = serde_yaml::from_str("pacman").unwrap();
        assert_eq!(manager, PackageManager::Pacman);
    }
}
