//! Execution driver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};

/// Environment variable overriding [`DriverConfig::shell`].
pub const ENV_SHELL: &str = "KILN_SHELL";

/// Environment variable overriding [`DriverConfig::failure_policy`].
pub const ENV_FAILURE_POLICY: &str = "KILN_FAILURE_POLICY";

/// What the driver does after a build command exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure and run the next command (default).
    #[default]
    Continue,
    /// Stop at the first failing command.
    Abort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            _ => Err(KilnError::Config(format!(
                "unknown failure policy: '{}' (supported: continue, abort)",
                s
            ))),
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Shell used to run each command line as `<shell> -c <line>`
    pub shell: String,

    /// Behavior after a failing command
    pub failure_policy: FailurePolicy,

    /// Log per-step progress at debug level instead of info
    pub quiet: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            failure_policy: FailurePolicy::Continue,
            quiet: false,
        }
    }
}

impl DriverConfig {
    /// Default configuration with `KILN_SHELL` and `KILN_FAILURE_POLICY` applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment-variable names as keys).
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shell) = lookup(ENV_SHELL).filter(|s| !s.trim().is_empty()) {
            self.shell = shell.trim().to_string();
        }
        if let Some(policy) = lookup(ENV_FAILURE_POLICY).filter(|s| !s.trim().is_empty()) {
            self.failure_policy = policy.parse()?;
        }
        Ok(self)
    }
}
