use super::{ReplicaMessage, SessionId, SessionRegistry};
use crate::library::{Identifier, LibrarySnapshot, Shard};
use std::sync::Arc;

/// Turns library mutations into replica messages and fans them out.
///
/// The session set is read once per call. All messages of one call are
/// queued for a session before moving to the next session, and the caller
/// holds the library for the whole call, so per-session order matches
/// mutation order.
#[derive(Clone)]
pub struct ReplicationBroadcaster {
    sessions: Arc<dyn SessionRegistry>,
}

impl ReplicationBroadcaster {
    pub fn new(sessions: Arc<dyn SessionRegistry>) -> Self {
        Self { sessions }
    }

    /// A shard is gone
    pub fn delete(&self, id: &Identifier) -> usize {
        self.broadcast(vec![ReplicaMessage::Delete { id: id.clone() }])
    }

    /// The library changed wholesale; replicas reset to `library`
    pub fn full_sync(&self, library: LibrarySnapshot) -> usize {
        self.broadcast(vec![ReplicaMessage::FullSync { library }])
    }

    /// A shard is new or changed
    pub fn upsert(&self, id: &Identifier, shard: &Shard) -> usize {
        self.broadcast(vec![ReplicaMessage::UpsertOne {
            id: id.clone(),
            shard: shard.clone(),
        }])
    }

    /// A shard moved from `old_id` to `new_id`: delete, then upsert
    pub fn migrate(&self, old_id: &Identifier, new_id: &Identifier, shard: &Shard) -> usize {
        self.broadcast(vec![
            ReplicaMessage::Delete { id: old_id.clone() },
            ReplicaMessage::UpsertOne {
                id: new_id.clone(),
                shard: shard.clone(),
            },
        ])
    }

    /// Send a full snapshot to one freshly connected session
    pub fn bootstrap(&self, session: SessionId, library: LibrarySnapshot) -> bool {
        let delivered = self
            .sessions
            .deliver(session, Arc::new(ReplicaMessage::FullSync { library }));
        if !delivered {
            tracing::debug!("Bootstrap for session {} was not delivered", session);
        }
        delivered
    }

    /// Deliver `messages` in order to every connected session. Returns the
    /// number of sessions that accepted all of them.
    pub fn broadcast(&self, messages: Vec<ReplicaMessage>) -> usize {
        let messages: Vec<Arc<ReplicaMessage>> = messages.into_iter().map(Arc::new).collect();
        let mut reached = 0;

        for session in self.sessions.active_sessions() {
            let missed = messages
                .iter()
                .find(|message| !self.sessions.deliver(session, Arc::clone(*message)));
            match missed {
                None => reached += 1,
                Some(message) => {
                    tracing::debug!("Session {} missed a {} update", session, message.kind())
                }
            }
        }

        if let Some(first) = messages.first() {
            tracing::debug!(
                "Broadcast {} message(s) starting with {} to {} session(s)",
                messages.len(),
                first.kind(),
                reached
            );
        }

        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ShardContent;
    use crate::replication::ChannelSessions;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    fn drain(
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Arc<ReplicaMessage>>,
    ) -> Vec<ReplicaMessage> {
        let mut received = Vec::new();
        while let Ok(message) = rx.try_recv() {
            received.push((*message).clone());
        }
        received
    }

    #[test]
    fn test_migrate_sends_delete_then_upsert() {
        let sessions = Arc::new(ChannelSessions::new());
        let (_a, mut rx_a) = sessions.connect();
        let (_b, mut rx_b) = sessions.connect();
        let broadcaster = ReplicationBroadcaster::new(sessions.clone());

        let shard = Shard::new(id("lore:diary"), id("mymod:quest_a"), ShardContent::default());
        let reached = broadcaster.migrate(&id("mymod:note1"), &id("lore:diary_othermod"), &shard);
        assert_eq!(reached, 2);

        let expected = vec![
            ReplicaMessage::Delete {
                id: id("mymod:note1"),
            },
            ReplicaMessage::UpsertOne {
                id: id("lore:diary_othermod"),
                shard,
            },
        ];
        assert_eq!(drain(&mut rx_a), expected);
        assert_eq!(drain(&mut rx_b), expected);
    }

    #[test]
    fn test_late_session_sees_nothing() {
        let sessions = Arc::new(ChannelSessions::new());
        let broadcaster = ReplicationBroadcaster::new(sessions.clone());

        broadcaster.delete(&id("mymod:note1"));
        let (_late, mut rx) = sessions.connect();

        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_closed_session_is_skipped() {
        let sessions = Arc::new(ChannelSessions::new());
        let (_gone, rx_gone) = sessions.connect();
        let (_live, mut rx_live) = sessions.connect();
        drop(rx_gone);
        let broadcaster = ReplicationBroadcaster::new(sessions.clone());

        let reached = broadcaster.full_sync(LibrarySnapshot::default());

        assert_eq!(reached, 1);
        assert_eq!(drain(&mut rx_live).len(), 1);
    }

    #[test]
    fn test_bootstrap_targets_one_session() {
        let sessions = Arc::new(ChannelSessions::new());
        let (first, mut rx_first) = sessions.connect();
        let (_second, mut rx_second) = sessions.connect();
        let broadcaster = ReplicationBroadcaster::new(sessions.clone());

        assert!(broadcaster.bootstrap(first, LibrarySnapshot::default()));

        assert_eq!(drain(&mut rx_first).len(), 1);
        assert!(drain(&mut rx_second).is_empty());
    }
}
