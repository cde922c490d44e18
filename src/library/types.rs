use super::Identifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A category of shard, registered once and referenced by shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardType {
    /// RGB colour used for the shard's name
    pub text_color: u32,
    /// RGB colour of the shard's glow
    pub glow_color: u32,
}

impl Default for ShardType {
    fn default() -> Self {
        Self {
            text_color: 0xFFFFFF,
            glow_color: 0xFFFFFF,
        }
    }
}

/// Display content of a shard. Opaque to the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardContent {
    pub name: String,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A single catalog record.
///
/// The shard's own identifier is the key it is stored under; the record
/// only carries what it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shard {
    pub shard_type: Identifier,
    /// Whatever produced this shard; the key of its group in the library
    pub source: Identifier,
    #[serde(flatten)]
    pub content: ShardContent,
}

impl Shard {
    pub fn new(shard_type: Identifier, source: Identifier, content: ShardContent) -> Self {
        Self {
            shard_type,
            source,
            content,
        }
    }
}

/// A point-in-time copy of the whole library.
///
/// Sent to replicas as a full sync and used as the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    pub shard_types: BTreeMap<Identifier, ShardType>,
    pub shards: BTreeMap<Identifier, Shard>,
    pub groups: BTreeMap<Identifier, BTreeSet<Identifier>>,
}

impl LibrarySnapshot {
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty() && self.groups.is_empty()
    }
}

/// Cross-index consistency between entries and groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Entries whose identifier is missing from their source's group
    pub ungrouped: Vec<Identifier>,
    /// Group members that name no entry
    pub dangling: Vec<(Identifier, Identifier)>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.ungrouped.is_empty() && self.dangling.is_empty()
    }
}
