use super::{CommandHandler, CommandResult};
use crate::config::PermissionLevels;
use crate::operations::ShardLibrary;
use crate::Result;

/// Handler for the `delete-all` command
pub struct DeleteAllCommand;

impl CommandHandler for DeleteAllCommand {
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult> {
        let outcome = library.delete_all();
        Ok(CommandResult::from_outcome(&outcome))
    }

    fn name(&self) -> &'static str {
        "delete-all"
    }

    fn required_level(&self, permissions: &PermissionLevels) -> u8 {
        permissions.delete_all
    }
}
