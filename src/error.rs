use crate::library::Identifier;
use thiserror::Error;

/// Caller errors raised by library operations.
///
/// Every variant is detected before the catalog is touched, so a failed
/// operation leaves no trace in the store, the dirty flag or the replicas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Unknown shard: {0}")]
    UnknownShard(Identifier),

    #[error("Unknown shard type: {0}")]
    UnknownShardType(Identifier),

    #[error("Malformed identifier '{input}': {reason}")]
    MalformedIdentifier { input: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ShardlibError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State file error: {0}")]
    State(String),

    #[error("Permission denied: '{command}' requires level {required}, caller has {actual}")]
    PermissionDenied {
        command: &'static str,
        required: u8,
        actual: u8,
    },
}

pub type Result<T> = std::result::Result<T, ShardlibError>;
