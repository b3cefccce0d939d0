//! Hook configuration
//!
//! Defaults applied to new hooks: the priority they register at and how many
//! arguments they ask the dispatcher for. Configuration can be given
//! programmatically or loaded from YAML:
//!
//! ```yaml
//! default_priority: 10
//! accepted_args: 100
//! ```
//!
//! Missing fields fall back to their defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HooksError, Result};

/// Priority hooks register at unless told otherwise
pub const DEFAULT_PRIORITY: i32 = 10;

/// Argument count a hook requests from the dispatcher
pub const DEFAULT_ACCEPTED_ARGS: usize = 100;

/// Defaults for newly created hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Priority used by [`Hook::on`](crate::Hook::on)
    pub default_priority: i32,

    /// Maximum number of arguments a hook accepts from the dispatcher
    pub accepted_args: usize,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            accepted_args: DEFAULT_ACCEPTED_ARGS,
        }
    }
}

impl HookConfig {
    /// Reject values a dispatcher could not honour
    pub fn validate(&self) -> Result<()> {
        if self.accepted_args == 0 {
            return Err(HooksError::InvalidConfiguration(
                "accepted_args must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads [`HookConfig`] from YAML
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the project configuration (`.silk/hooks.yaml`)
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<HookConfig> {
        Self::load_from_path(&PathBuf::from(".silk/hooks.yaml"))
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// YAML, or fails validation.
    pub fn load_from_path(path: &Path) -> Result<HookConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "No hook configuration found, using defaults");
            return Ok(HookConfig::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;

        debug!(
            path = %path.display(),
            default_priority = config.default_priority,
            accepted_args = config.accepted_args,
            "Loaded hook configuration"
        );

        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<HookConfig> {
        if content.trim().is_empty() {
            return Ok(HookConfig::default());
        }

        let config: HookConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
