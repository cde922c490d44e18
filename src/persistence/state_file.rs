//! On-disk form of the library
//!
//! Stores shard types and shards as pretty JSON. Groups are derived data
//! and are rebuilt from shard sources when the file is loaded.

use crate::library::{CatalogStore, Identifier, LibrarySnapshot, Shard, ShardType};
use crate::{Result, ShardlibError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Current state file format version
pub const STATE_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStateFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub shard_types: BTreeMap<Identifier, ShardType>,
    #[serde(default)]
    pub shards: BTreeMap<Identifier, Shard>,
}

impl LibraryStateFile {
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Self {
        Self {
            version: STATE_FILE_VERSION,
            saved_at: Utc::now(),
            shard_types: snapshot.shard_types,
            shards: snapshot.shards,
        }
    }

    pub fn into_store(self) -> CatalogStore {
        CatalogStore::from_parts(self.shard_types, self.shards)
    }

    /// Load a library from `path`. A missing file is an empty library.
    pub fn load(path: &Path) -> Result<CatalogStore> {
        if !path.exists() {
            tracing::debug!("No state file at {}, starting empty", path.display());
            return Ok(CatalogStore::new());
        }

        let content = fs::read_to_string(path)?;
        let file: LibraryStateFile = serde_json::from_str(&content)?;
        if file.version > STATE_FILE_VERSION {
            return Err(ShardlibError::State(format!(
                "{} was written by a newer version (format {}, supported {})",
                path.display(),
                file.version,
                STATE_FILE_VERSION
            )));
        }

        let store = file.into_store();
        tracing::info!(
            "Loaded {} shards and {} shard types from {}",
            store.len(),
            store.type_count(),
            path.display()
        );
        Ok(store)
    }

    /// Write `snapshot` to `path`, replacing any previous file
    pub fn save(path: &Path, snapshot: LibrarySnapshot) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&Self::from_snapshot(snapshot))?;

        // Staged beside the target; the rename replaces the old file in one step
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, content)?;
        fs::rename(&staging, path)?;

        tracing::debug!("Saved library to {}", path.display());
        Ok(())
    }
}
