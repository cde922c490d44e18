use crate::library::Identifier;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// shardlib: manage the server's authoritative shard library
#[derive(Parser, Debug)]
#[command(name = "shardlib")]
#[command(version = "0.1.0")]
#[command(about = "Manage the server's authoritative shard library")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to .shardlib/config.yaml or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Library state file, overriding the configured one
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Set log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Operator level of the caller (0-4)
    #[arg(long, default_value_t = 4, global = true)]
    pub permission_level: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete one shard from the library
    Delete {
        /// Shard identifier (namespace:path)
        shard_id: Identifier,
    },

    /// Delete every shard from the library
    DeleteAll,

    /// Move a shard to a new type under an identifier derived from the owner
    Migrate {
        /// Shard identifier (namespace:path)
        shard_id: Identifier,

        /// Owner token the new identifier is derived from (usually a mod id)
        owner: String,

        /// Shard type to migrate to
        shard_type: Identifier,
    },

    /// List shards in the library
    List {
        /// Only show shards grouped under this source
        #[arg(long)]
        source: Option<Identifier>,
    },

    /// List registered shard types
    Types,
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Delete { .. } => "delete",
            Commands::DeleteAll => "delete-all",
            Commands::Migrate { .. } => "migrate",
            Commands::List { .. } => "list",
            Commands::Types => "types",
        }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
