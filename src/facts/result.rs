//! Tri-state fact values.
//!
//! A presence fact is either detected (`True`) or not reported at all
//! (`Absent`). There is no `False`: "not installed" and "could not tell" look
//! the same to the host.

use serde::{Serialize, Serializer};
use std::fmt;

/// The value of a presence fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeResult {
    /// The package was detected.
    True,
    /// Not detected, not applicable, or the query was inconclusive.
    Absent,
}

impl ProbeResult {
    /// Whether the fact resolved to `True`.
    pub fn is_true(&self) -> bool {
        matches!(self, ProbeResult::True)
    }

    /// Whether the fact resolved to `Absent`.
    pub fn is_absent(&self) -> bool {
        matches!(self, ProbeResult::Absent)
    }

    /// `Some(true)` for `True`, `None` for `Absent`.
    pub fn as_option(&self) -> Option<bool> {
        match self {
            ProbeResult::True => Some(true),
            ProbeResult::Absent => None,
        }
    }
}

impl From<bool> for ProbeResult {
    fn from(detected: bool) -> Self {
        if detected {
            ProbeResult::True
        } else {
            ProbeResult::Absent
        }
    }
}

impl Serialize for ProbeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeResult::True => serializer.serialize_bool(true),
            ProbeResult::Absent => serializer.serialize_none(),
        }
    }
}

/// Formats like a fact host would print it: `true`, or nothing.
impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::True => write!(f, "true"),
            ProbeResult::Absent => Ok(()),
        }
    }
}
