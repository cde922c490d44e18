use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration (config.yaml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Library state file; resolved from the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// How often the autosave loop checks the dirty flag
    pub autosave_interval_ms: u64,

    /// Permission level required by each library command
    pub permissions: PermissionLevels,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            autosave_interval_ms: 5_000,
            permissions: PermissionLevels::default(),
        }
    }
}

impl ServerConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }
}

/// Operator levels, 0 (anyone) to 4 (owner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionLevels {
    pub delete: u8,
    pub delete_all: u8,
    pub migrate: u8,
    /// Read-only listing commands
    pub inspect: u8,
}

impl Default for PermissionLevels {
    fn default() -> Self {
        Self {
            delete: 3,
            delete_all: 4,
            migrate: 3,
            inspect: 0,
        }
    }
}
