use anyhow::{Context, Result};
use clap::Parser;
use shardlib::{
    cli::commands::{
        CommandHandler, CommandRunner, DeleteAllCommand, DeleteCommand, ListCommand,
        MigrateCommand, TypesCommand,
    },
    cli::{Cli, Commands, LogLevel},
    config::ServerConfig,
    io::ShardlibPaths,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing from --log-level, letting RUST_LOG take precedence
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    // Logs go to stderr; stdout carries command feedback
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.log_level);

    let paths = ShardlibPaths::discover();
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(|| config.resolve_state_file(&paths));
    tracing::debug!("Using state file {}", state_file.display());

    let command_name = cli.command.name();
    let handler: Box<dyn CommandHandler> = match cli.command {
        Commands::Delete { shard_id } => Box::new(DeleteCommand::new(shard_id)),
        Commands::DeleteAll => Box::new(DeleteAllCommand),
        Commands::Migrate {
            shard_id,
            owner,
            shard_type,
        } => Box::new(MigrateCommand::new(shard_id, owner, shard_type)),
        Commands::List { source } => Box::new(ListCommand::new(source)),
        Commands::Types => Box::new(TypesCommand),
    };

    let runner = CommandRunner::new(config, state_file, cli.permission_level);
    let result = runner
        .run(handler.as_ref())
        .with_context(|| format!("'{}' failed", command_name))?;

    println!("{}", result.message);
    Ok(())
}
