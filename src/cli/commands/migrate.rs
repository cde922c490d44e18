use super::{CommandHandler, CommandResult};
use crate::config::PermissionLevels;
use crate::library::Identifier;
use crate::operations::ShardLibrary;
use crate::Result;

/// Handler for the `migrate` command
pub struct MigrateCommand {
    pub shard_id: Identifier,
    pub owner: String,
    pub shard_type: Identifier,
}

impl CommandHandler for MigrateCommand {
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult> {
        let outcome = library.migrate(&self.shard_id, &self.owner, &self.shard_type)?;
        Ok(CommandResult::from_outcome(&outcome))
    }

    fn name(&self) -> &'static str {
        "migrate"
    }

    fn required_level(&self, permissions: &PermissionLevels) -> u8 {
        permissions.migrate
    }
}

impl MigrateCommand {
    /// Create new migrate command
    pub fn new(shard_id: Identifier, owner: String, shard_type: Identifier) -> Self {
        Self {
            shard_id,
            owner,
            shard_type,
        }
    }
}
