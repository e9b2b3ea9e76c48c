pub mod config;
pub mod inspect;
pub mod plans;
pub mod ranges;
pub mod search;
pub mod types;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::RuntimePaths;
use crate::models::{EnvelopeCommandFailure, QueryEnvelope};
use crate::query::error::QueryError;
use crate::store;
use crate::utils::time::parse_epoch_seconds;

pub(crate) fn open_connection(command: &str, runtime_paths: &RuntimePaths) -> Result<Connection> {
    let connection = store::open_store(&runtime_paths.db_path).map_err(|error| {
        command_failure(command, "store_unavailable", &format!("{error:#}"), false)
    })?;
    store::ensure_store_schema(&connection).map_err(|error| {
        command_failure(command, "store_schema_failed", &format!("{error:#}"), false)
    })?;
    Ok(connection)
}

pub(crate) fn parse_time(command: &str, label: &str, raw: &str) -> Result<i64> {
    parse_epoch_seconds(raw).map_err(|error| {
        command_failure(
            command,
            "time_input_invalid",
            &format!("invalid {label} time: {error:#}"),
            true,
        )
    })
}

pub(crate) fn query_failure(command: &str, error: &QueryError) -> anyhow::Error {
    command_failure(command, error.code(), &error.to_string(), error.is_input_error())
}

pub(crate) fn command_failure(
    command: &str,
    code: &str,
    message: &str,
    input_error: bool,
) -> anyhow::Error {
    let envelope = QueryEnvelope::error(command, code, message);
    anyhow::Error::new(EnvelopeCommandFailure::new(envelope, input_error))
}

pub(crate) fn print_envelope(envelope: &QueryEnvelope) -> Result<()> {
    let encoded = serde_json::to_string(envelope).map_err(|error| {
        command_failure(
            &envelope.command,
            "envelope_encode_failed",
            &format!("{error:#}"),
            false,
        )
    })?;
    println!("{encoded}");
    Ok(())
}
