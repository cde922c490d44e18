use super::types::ServerConfig;
use crate::io::paths::ShardlibPaths;
use crate::{Result, ShardlibError};
use std::path::{Path, PathBuf};

/// Highest operator level a command may require
pub const MAX_PERMISSION_LEVEL: u8 = 4;

impl ServerConfig {
    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ShardlibError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: ServerConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.autosave_interval_ms == 0 {
            return Err(ShardlibError::Config(
                "autosave_interval_ms must be greater than zero".to_string(),
            ));
        }

        let levels = [
            ("delete", self.permissions.delete),
            ("delete_all", self.permissions.delete_all),
            ("migrate", self.permissions.migrate),
            ("inspect", self.permissions.inspect),
        ];
        for (command, level) in levels {
            if level > MAX_PERMISSION_LEVEL {
                return Err(ShardlibError::Config(format!(
                    "permissions.{} is {}, maximum is {}",
                    command, level, MAX_PERMISSION_LEVEL
                )));
            }
        }

        Ok(())
    }

    /// The state file to use: the configured one, or the default location
    pub fn resolve_state_file(&self, paths: &ShardlibPaths) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| paths.state_file())
    }
}
