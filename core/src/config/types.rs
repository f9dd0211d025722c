use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SyncError};

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "vuex";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Key the snapshot is stored under.
    #[serde(default = "default_key")]
    pub key: String,

    /// Dotted paths selecting the sub-trees to persist. Empty persists the
    /// whole state.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Throttle window for mutation-triggered writes, in milliseconds.
    #[serde(default)]
    pub throttle_ms: u64,

    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Write the (reduced) state once during activation, before any
    /// mutation is observed.
    #[serde(default)]
    pub initial_set: bool,
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            paths: Vec::new(),
            throttle_ms: 0,
            throttle: ThrottleConfig::default(),
            initial_set: false,
        }
    }
}

impl PersistConfig {
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(SyncError::Config("key must not be empty".to_string()));
        }
        for path in &self.paths {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(SyncError::Config(format!(
                    "path {path:?} has an empty segment"
                )));
            }
        }
        Ok(())
    }
}

/// Edge behavior of the throttle gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Let the first call of a burst through immediately.
    #[serde(default = "default_edge")]
    pub leading: bool,

    /// Replay the last call of a burst when the window closes.
    #[serde(default = "default_edge")]
    pub trailing: bool,
}

fn default_edge() -> bool {
    true
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            leading: default_edge(),
            trailing: default_edge(),
        }
    }
}
