pub mod delete;
pub mod delete_all;
pub mod list;
pub mod migrate;

use crate::config::{PermissionLevels, ServerConfig};
use crate::operations::{OperationOutcome, ShardLibrary};
use crate::persistence::LibraryStateFile;
use crate::{Result, ShardlibError};
use std::path::PathBuf;

pub use delete::DeleteCommand;
pub use delete_all::DeleteAllCommand;
pub use list::{ListCommand, TypesCommand};
pub use migrate::MigrateCommand;

/// Common trait for all command handlers
pub trait CommandHandler {
    /// Execute the command against the loaded library
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult>;

    /// Get command name for logging
    fn name(&self) -> &'static str;

    /// Operator level needed to run this command
    fn required_level(&self, permissions: &PermissionLevels) -> u8;
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Feedback shown to the caller
    pub message: String,
    /// Numeric result (1 for single-shard commands, a count otherwise)
    pub value: usize,
    /// Localization key for `message`, when the command has one
    pub translation_key: Option<&'static str>,
}

impl CommandResult {
    pub fn new(message: impl Into<String>, value: usize) -> Self {
        Self {
            message: message.into(),
            value,
            translation_key: None,
        }
    }

    /// Feedback for a library operation
    pub fn from_outcome(outcome: &dyn OperationOutcome) -> Self {
        Self {
            message: outcome.to_string(),
            value: outcome.command_result(),
            translation_key: Some(outcome.translation_key()),
        }
    }
}

/// Runs one command against the library in a state file.
///
/// The state file is the persistence collaborator here: it is written back
/// only when the command left the library dirty.
pub struct CommandRunner {
    config: ServerConfig,
    state_file: PathBuf,
    permission_level: u8,
}

impl CommandRunner {
    pub fn new(config: ServerConfig, state_file: PathBuf, permission_level: u8) -> Self {
        Self {
            config,
            state_file,
            permission_level,
        }
    }

    pub fn state_file(&self) -> &PathBuf {
        &self.state_file
    }

    pub fn run(&self, handler: &dyn CommandHandler) -> Result<CommandResult> {
        let required = handler.required_level(&self.config.permissions);
        if self.permission_level < required {
            return Err(ShardlibError::PermissionDenied {
                command: handler.name(),
                required,
                actual: self.permission_level,
            });
        }

        let store = LibraryStateFile::load(&self.state_file)?;
        let mut library = ShardLibrary::offline(store);

        let result = handler.execute(&mut library)?;

        if library.gate().take_dirty() {
            LibraryStateFile::save(&self.state_file, library.store().snapshot())?;
            tracing::info!(
                "Saved library after '{}' to {}",
                handler.name(),
                self.state_file.display()
            );
        }

        Ok(result)
    }
}
