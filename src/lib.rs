//! shardlib keeps one authoritative shard library on a server and keeps
//! connected replicas in step with it.
//!
//! Mutations go through [`operations::ShardLibrary`], which updates the
//! [`library::CatalogStore`], marks the [`persistence::PersistenceGate`]
//! dirty and broadcasts [`replication::ReplicaMessage`]s to every session.

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod library;
pub mod operations;
pub mod persistence;
pub mod replication;

pub use error::{LibraryError, Result, ShardlibError};
