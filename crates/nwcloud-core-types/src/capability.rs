//! Capability vocabulary
//!
//! A capability is one togglable piece of project configuration. Each one is
//! exposed as an enable/disable command pair; its state is never stored, it is
//! derived from which backup files exist on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A togglable configuration feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Build plugins and deploy properties for the cloud platform
    Deploy,
    /// JPA persistence backed by the platform's JNDI data source
    Jpa,
}

impl Capability {
    /// All capabilities, in display order
    pub const ALL: [Capability; 2] = [Capability::Deploy, Capability::Jpa];

    /// Stable lowercase name, used in command names and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Deploy => "deploy",
            Capability::Jpa => "jpa",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deploy" => Ok(Capability::Deploy),
            "jpa" => Ok(Capability::Jpa),
            other => Err(format!("unknown capability '{}'", other)),
        }
    }
}

/// Which half of a command pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Enable,
    Disable,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Enable => "enable",
            Direction::Disable => "disable",
        }
    }
}

/// Derived state of a capability
///
/// `Enabled` iff every backup written by the enable command is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Disabled,
    Enabled,
}

impl fmt::Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleState::Disabled => f.write_str("disabled"),
            ToggleState::Enabled => f.write_str("enabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_parse_is_case_insensitive() {
        assert_eq!("JPA".parse::<Capability>(), Ok(Capability::Jpa));
        assert_eq!("deploy".parse::<Capability>(), Ok(Capability::Deploy));
        assert!("ejb".parse::<Capability>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Capability::Deploy).unwrap();
        assert_eq!(json, "\"deploy\"");

        let state: ToggleState = serde_json::from_str("\"enabled\"").unwrap();
        assert_eq!(state, ToggleState::Enabled);
    }
}
