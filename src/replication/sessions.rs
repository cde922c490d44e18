use super::ReplicaMessage;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Identifies one connected replica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The set of connected replicas and a way to reach each of them.
///
/// Implemented by the transport. Delivery is fire-and-forget: no
/// acknowledgement, no retry, and a gone session simply misses the message.
/// Messages delivered to one session must arrive in delivery order.
pub trait SessionRegistry: Send + Sync {
    /// Sessions connected right now
    fn active_sessions(&self) -> Vec<SessionId>;

    /// Queue `message` for `session`. Returns false if the session is gone.
    fn deliver(&self, session: SessionId, message: Arc<ReplicaMessage>) -> bool;
}

/// In-process transport: one unbounded, ordered channel per session.
#[derive(Debug, Default)]
pub struct ChannelSessions {
    senders: RwLock<HashMap<SessionId, UnboundedSender<Arc<ReplicaMessage>>>>,
}

impl ChannelSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and hand back its receiving end
    pub fn connect(&self) -> (SessionId, UnboundedReceiver<Arc<ReplicaMessage>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = SessionId::new();
        self.senders.write().insert(session, tx);
        tracing::debug!("Replica session connected: {}", session);
        (session, rx)
    }

    pub fn disconnect(&self, session: SessionId) -> bool {
        let removed = self.senders.write().remove(&session).is_some();
        if removed {
            tracing::debug!("Replica session disconnected: {}", session);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.senders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.read().is_empty()
    }
}

impl SessionRegistry for ChannelSessions {
    fn active_sessions(&self) -> Vec<SessionId> {
        self.senders.read().keys().copied().collect()
    }

    fn deliver(&self, session: SessionId, message: Arc<ReplicaMessage>) -> bool {
        let senders = self.senders.read();
        match senders.get(&session) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }
}

/// A registry with nobody connected, for offline use of the library
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSessions;

impl SessionRegistry for NoSessions {
    fn active_sessions(&self) -> Vec<SessionId> {
        Vec::new()
    }

    fn deliver(&self, _session: SessionId, _message: Arc<ReplicaMessage>) -> bool {
        false
    }
}
