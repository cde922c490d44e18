use super::ReplicaMessage;
use crate::library::{CatalogStore, Identifier, LibrarySnapshot, Shard};

/// Replica-side copy of the library, updated only by applying messages.
///
/// A full sync restores the server's snapshot as sent, grouping index
/// included. Incremental upserts link the shard into its source group.
#[derive(Debug, Clone, Default)]
pub struct ReplicaMirror {
    library: CatalogStore,
}

impl ReplicaMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: &ReplicaMessage) {
        match message {
            // Idempotent: deleting an unknown shard is fine
            ReplicaMessage::Delete { id } => {
                self.library.remove(id);
            }
            ReplicaMessage::FullSync { library } => {
                self.library = CatalogStore::from_snapshot(library.clone());
            }
            ReplicaMessage::UpsertOne { id, shard } => {
                self.library.insert(id.clone(), shard.clone());
            }
        }
    }

    pub fn get(&self, id: &Identifier) -> Option<&Shard> {
        self.library.get(id)
    }

    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    pub fn library(&self) -> &CatalogStore {
        &self.library
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        self.library.snapshot()
    }
}
