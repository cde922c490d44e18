//! Replication of the server library to connected replicas

pub mod broadcaster;
pub mod message;
pub mod mirror;
pub mod sessions;

pub use broadcaster::ReplicationBroadcaster;
pub use message::ReplicaMessage;
pub use mirror::ReplicaMirror;
pub use sessions::{ChannelSessions, NoSessions, SessionId, SessionRegistry};
