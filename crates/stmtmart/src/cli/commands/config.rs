use anyhow::Result;
use clap::{ArgAction, Args, Subcommand};
use serde_json::json;

use super::{open_connection, print_envelope, query_failure};
use crate::config::RuntimePaths;
use crate::models::{QueryEnvelope, StmtConfig};
use crate::settings::{
    DEFAULT_HISTORY_SIZE, DEFAULT_REFRESH_INTERVAL, read_stmt_config, write_stmt_config,
};

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    Get,
    Set(ConfigSetArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigSetArgs {
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub enabled: bool,

    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REFRESH_INTERVAL)]
    pub refresh_interval: i64,

    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_HISTORY_SIZE)]
    pub history_size: i64,
}

pub fn run(args: &ConfigArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    match &args.command {
        ConfigCommand::Get => run_get(runtime_paths),
        ConfigCommand::Set(set_args) => run_set(set_args, runtime_paths),
    }
}

fn run_get(runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "config.get";
    let connection = open_connection(COMMAND, runtime_paths)?;
    let config =
        read_stmt_config(&connection).map_err(|error| query_failure(COMMAND, &error))?;

    let envelope = QueryEnvelope::ok(COMMAND, json!(config))
        .with_meta("db_path", json!(runtime_paths.db_path.display().to_string()));
    print_envelope(&envelope)
}

fn run_set(args: &ConfigSetArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "config.set";
    let connection = open_connection(COMMAND, runtime_paths)?;
    let config = StmtConfig {
        enabled: args.enabled,
        refresh_interval: args.refresh_interval,
        history_size: args.history_size,
    };
    write_stmt_config(&connection, &config).map_err(|error| query_failure(COMMAND, &error))?;

    let envelope = QueryEnvelope::ok(COMMAND, json!(config))
        .with_meta("settings_written", json!(if config.enabled { 3 } else { 1 }));
    print_envelope(&envelope)
}
