use super::{CommandHandler, CommandResult};
use crate::config::PermissionLevels;
use crate::library::Identifier;
use crate::operations::ShardLibrary;
use crate::Result;

/// Handler for the `delete` command
pub struct DeleteCommand {
    pub shard_id: Identifier,
}

impl CommandHandler for DeleteCommand {
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult> {
        let outcome = library.delete(&self.shard_id)?;
        Ok(CommandResult::from_outcome(&outcome))
    }

    fn name(&self) -> &'static str {
        "delete"
    }

    fn required_level(&self, permissions: &PermissionLevels) -> u8 {
        permissions.delete
    }
}

impl DeleteCommand {
    /// Create new delete command
    pub fn new(shard_id: Identifier) -> Self {
        Self { shard_id }
    }
}
