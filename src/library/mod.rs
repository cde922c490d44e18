//! The shard library: identifiers, records and the catalog store

pub mod identifier;
pub mod store;
pub mod types;

pub use identifier::Identifier;
pub use store::CatalogStore;
pub use types::{ConsistencyReport, LibrarySnapshot, Shard, ShardContent, ShardType};
