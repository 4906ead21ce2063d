//! Dry-run modes understood by `kubectl apply --dry-run`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names indexed by the mode's discriminant. Order is part of the contract.
const DRY_RUN_NAMES: [&str; 3] = ["none", "client", "server"];

/// Dry-run mode for apply operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DryRun {
    /// Persist changes (no dry-run)
    #[default]
    None = 0,
    /// Only print what would be sent, without contacting the server
    Client = 1,
    /// Submit the request to the server without persisting it
    Server = 2,
}

impl DryRun {
    /// String form used for the `--dry-run` flag
    pub const fn as_str(self) -> &'static str {
        DRY_RUN_NAMES[self as usize]
    }

    /// Whether a `--dry-run` flag should be passed at all
    pub const fn is_enabled(self) -> bool {
        !matches!(self, DryRun::None)
    }
}

impl fmt::Display for DryRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DryRun {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            _ => Err(format!(
                "invalid dry-run mode '{}', expected one of: {}",
                s,
                DRY_RUN_NAMES.join(", ")
            )),
        }
    }
}

/// `true` requests a server-side dry-run
impl From<bool> for DryRun {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Server } else { Self::None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_names() {
        assert_eq!(DryRun::None.to_string(), "none");
        assert_eq!(DryRun::Client.to_string(), "client");
        assert_eq!(DryRun::Server.to_string(), "server");
        assert_eq!(DryRun::Server as u8, 2);
    }

    #[test]
    fn test_parse() {
        assert_eq!("client".parse::<DryRun>().unwrap(), DryRun::Client);
        assert_eq!("server".parse::<DryRun>().unwrap(), DryRun::Server);
        assert!("Server".parse::<DryRun>().is_err());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(DryRun::from(true), DryRun::Server);
        assert_eq!(DryRun::from(false), DryRun::None);
        assert!(!DryRun::default().is_enabled());
        assert!(DryRun::Client.is_enabled());
    }
}
