//! Bridge configuration
//!
//! Can be built in code or loaded from YAML:
//!
//! ```yaml
//! binary: /usr/local/bin/kubectl
//! defaultTimeout: 30s
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{KubectlError, Result};

/// Deadline used when the caller's context has none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for a [`crate::Kubectl`] client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubectlConfig {
    /// kubectl executable (looked up on `PATH` when not absolute)
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Deadline applied to calls whose context carries none
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub default_timeout: Duration,
}

fn default_binary() -> PathBuf {
    PathBuf::from("kubectl")
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            default_timeout: default_timeout(),
        }
    }
}

impl KubectlConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Use a specific kubectl executable
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Change the fallback deadline
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.binary.as_os_str().is_empty() {
            return Err(KubectlError::InvalidConfig(
                "binary cannot be empty".to_string(),
            ));
        }
        if self.default_timeout.is_zero() {
            return Err(KubectlError::InvalidConfig(
                "defaultTimeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
