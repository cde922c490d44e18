//! High-level library operations
//!
//! Each operation checks its preconditions, mutates the [`CatalogStore`],
//! marks the [`PersistenceGate`] dirty and then notifies replicas through
//! the [`ReplicationBroadcaster`]. A failed precondition leaves all three
//! untouched.

pub mod outcome;

pub use outcome::{Deleted, DeletedAll, Migrated, OperationOutcome};

use crate::error::LibraryError;
use crate::library::{CatalogStore, Identifier, Shard, ShardType};
use crate::persistence::PersistenceGate;
use crate::replication::{NoSessions, ReplicationBroadcaster, SessionId, SessionRegistry};
use std::sync::Arc;

/// The server's authoritative library.
///
/// Mutating methods take `&mut self`; servers that share the library keep
/// it behind a single lock so there is only ever one writer.
pub struct ShardLibrary {
    store: CatalogStore,
    gate: Arc<PersistenceGate>,
    broadcaster: ReplicationBroadcaster,
}

impl ShardLibrary {
    pub fn new(
        store: CatalogStore,
        gate: Arc<PersistenceGate>,
        sessions: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            store,
            gate,
            broadcaster: ReplicationBroadcaster::new(sessions),
        }
    }

    /// A library nobody is connected to
    pub fn offline(store: CatalogStore) -> Self {
        Self::new(store, Arc::new(PersistenceGate::new()), Arc::new(NoSessions))
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn gate(&self) -> &Arc<PersistenceGate> {
        &self.gate
    }

    /// Register a shard type. Replicas pick types up on their next full sync.
    pub fn register_type(&mut self, id: Identifier, shard_type: ShardType) {
        self.store.register_type(id, shard_type);
        self.gate.mark_dirty();
    }

    /// Add or replace a shard and push it to replicas
    pub fn insert(&mut self, id: Identifier, shard: Shard) {
        self.store.insert(id.clone(), shard.clone());
        self.gate.mark_dirty();
        self.broadcaster.upsert(&id, &shard);
    }

    /// Delete one shard
    pub fn delete(&mut self, id: &Identifier) -> Result<Deleted, LibraryError> {
        if !self.store.contains(id) {
            return Err(LibraryError::UnknownShard(id.clone()));
        }

        self.store.remove(id);
        self.gate.mark_dirty();
        let reached = self.broadcaster.delete(id);

        tracing::debug!("Deleted shard {} ({} sessions notified)", id, reached);
        Ok(Deleted { id: id.clone() })
    }

    /// Delete every shard; replicas get a full sync of the emptied library
    pub fn delete_all(&mut self) -> DeletedAll {
        let count = self.store.remove_all();
        self.gate.mark_dirty();
        let reached = self.broadcaster.full_sync(self.store.snapshot());

        tracing::debug!("Deleted {} shards ({} sessions resynced)", count, reached);
        DeletedAll { count }
    }

    /// Move a shard to the identifier derived from `new_type` and `owner`,
    /// retyping it as `new_type`.
    pub fn migrate(
        &mut self,
        id: &Identifier,
        owner: &str,
        new_type: &Identifier,
    ) -> Result<Migrated, LibraryError> {
        if !self.store.has_type(new_type) {
            return Err(LibraryError::UnknownShardType(new_type.clone()));
        }
        if !self.store.contains(id) {
            return Err(LibraryError::UnknownShard(id.clone()));
        }
        let new_id = CatalogStore::new_identifier_for(new_type, owner)?;

        let shard = self.store.rekey(id, new_type, new_id.clone())?.clone();
        self.gate.mark_dirty();
        let reached = self.broadcaster.migrate(id, &new_id, &shard);

        tracing::debug!(
            "Migrated shard {} to {} ({} sessions notified)",
            id,
            new_id,
            reached
        );
        Ok(Migrated {
            old_id: id.clone(),
            new_id,
        })
    }

    /// Send the whole library to a newly connected session
    pub fn connect_replica(&self, session: SessionId) -> bool {
        self.broadcaster.bootstrap(session, self.store.snapshot())
    }
}
