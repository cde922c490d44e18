use crate::library::Identifier;
use std::fmt;

/// What a successful library operation reports back to its trigger
pub trait OperationOutcome: fmt::Display {
    /// Key for localized feedback text
    fn translation_key(&self) -> &'static str;

    /// Numeric command result: 1 for single-shard commands
    fn command_result(&self) -> usize {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub id: Identifier,
}

impl fmt::Display for Deleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted shard {} from the library", self.id)
    }
}

impl OperationOutcome for Deleted {
    fn translation_key(&self) -> &'static str {
        "commands.shardlib.library.delete"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedAll {
    pub count: usize,
}

impl fmt::Display for DeletedAll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted all {} shards from the library", self.count)
    }
}

impl OperationOutcome for DeletedAll {
    fn translation_key(&self) -> &'static str {
        "commands.shardlib.library.delete.all"
    }

    fn command_result(&self) -> usize {
        self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated {
    pub old_id: Identifier,
    pub new_id: Identifier,
}

impl fmt::Display for Migrated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Migrated shard {} to {}", self.old_id, self.new_id)
    }
}

impl OperationOutcome for Migrated {
    fn translation_key(&self) -> &'static str {
        "commands.shardlib.library.migrate"
    }
}
