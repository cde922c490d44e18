use crate::{Result, ShardlibError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Where shardlib keeps its configuration and library state
#[derive(Debug, Clone)]
pub struct ShardlibPaths {
    /// Configuration directory (.shardlib/)
    pub config_dir: PathBuf,
    /// Data directory holding the library state file
    pub data_dir: PathBuf,
}

impl ShardlibPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "shardlib").ok_or_else(|| {
            ShardlibError::Path("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }

    /// Create paths for a specific project directory
    pub fn for_project(project_root: &Path) -> Self {
        let config_dir = project_root.join(".shardlib");
        let data_dir = config_dir.clone();
        Self {
            config_dir,
            data_dir,
        }
    }

    /// Project-local paths when `.shardlib/` exists in the current
    /// directory, platform directories otherwise
    pub fn discover() -> Self {
        if let Ok(current_dir) = std::env::current_dir() {
            if current_dir.join(".shardlib").is_dir() {
                return Self::for_project(&current_dir);
            }
        }
        Self::default()
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("library.json")
    }
}

impl Default for ShardlibPaths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if platform directories fail
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::for_project(&current_dir)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_paths() {
        let project_root = Path::new("/tmp/test-project");
        let paths = ShardlibPaths::for_project(project_root);

        assert_eq!(paths.config_dir, project_root.join(".shardlib"));
        assert_eq!(paths.config_file(), project_root.join(".shardlib/config.yaml"));
        assert_eq!(paths.state_file(), project_root.join(".shardlib/library.json"));
    }

    #[test]
    fn test_default_paths_end_in_known_files() {
        let paths = ShardlibPaths::default();

        assert!(paths.config_file().ends_with("config.yaml"));
        assert!(paths.state_file().ends_with("library.json"));
    }
}
