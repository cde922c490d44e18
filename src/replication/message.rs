use crate::library::{Identifier, LibrarySnapshot, Shard};
use serde::{Deserialize, Serialize};

/// Messages sent from the server library to replicas.
///
/// Delivery is ordered per session and carries no sequence numbers, so the
/// order in which a mutation emits messages is part of the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReplicaMessage {
    /// Drop the shard if the replica holds it
    Delete { id: Identifier },
    /// Replace the replica's whole library
    FullSync { library: LibrarySnapshot },
    /// The shard is new or changed under `id`
    UpsertOne { id: Identifier, shard: Shard },
}

impl ReplicaMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ReplicaMessage::Delete { .. } => "delete",
            ReplicaMessage::FullSync { .. } => "full_sync",
            ReplicaMessage::UpsertOne { .. } => "upsert_one",
        }
    }
}
