use super::{CommandHandler, CommandResult};
use crate::config::PermissionLevels;
use crate::library::{Identifier, Shard};
use crate::operations::ShardLibrary;
use crate::Result;
use std::collections::BTreeMap;

/// Handler for the `list` command
pub struct ListCommand {
    pub source: Option<Identifier>,
}

impl CommandHandler for ListCommand {
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult> {
        let store = library.store();
        let shards: Vec<(&Identifier, &Shard)> = match &self.source {
            Some(source) => store
                .group(source)
                .filter_map(|id| store.get(id).map(|shard| (id, shard)))
                .collect(),
            None => store.iter().collect(),
        };

        let mut lines: Vec<String> = shards
            .iter()
            .map(|(id, shard)| format_shard(id, shard))
            .collect();
        lines.push(format!("{} shard(s)", shards.len()));

        let ungrouped = store.consistency().ungrouped.len();
        if self.source.is_none() && ungrouped > 0 {
            lines.push(format!(
                "{} shard(s) are missing from their source's group",
                ungrouped
            ));
        }

        Ok(CommandResult::new(lines.join("\n"), shards.len()))
    }

    fn name(&self) -> &'static str {
        "list"
    }

    fn required_level(&self, permissions: &PermissionLevels) -> u8 {
        permissions.inspect
    }
}

impl ListCommand {
    /// Create new list command
    pub fn new(source: Option<Identifier>) -> Self {
        Self { source }
    }
}

fn format_shard(id: &Identifier, shard: &Shard) -> String {
    format!(
        "{}  [{}]  from {}  \"{}\"",
        id, shard.shard_type, shard.source, shard.content.name
    )
}

/// Handler for the `types` command
pub struct TypesCommand;

impl CommandHandler for TypesCommand {
    fn execute(&self, library: &mut ShardLibrary) -> Result<CommandResult> {
        let store = library.store();
        let mut usage: BTreeMap<&Identifier, usize> = BTreeMap::new();
        for (_, shard) in store.iter() {
            *usage.entry(&shard.shard_type).or_default() += 1;
        }

        let mut lines: Vec<String> = store
            .types()
            .map(|(id, _)| format!("{}  ({} shards)", id, usage.get(id).copied().unwrap_or(0)))
            .collect();
        lines.push(format!("{} shard type(s)", store.type_count()));

        Ok(CommandResult::new(lines.join("\n"), store.type_count()))
    }

    fn name(&self) -> &'static str {
        "types"
    }

    fn required_level(&self, permissions: &PermissionLevels) -> u8 {
        permissions.inspect
    }
}
