use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{open_connection, print_envelope, query_failure};
use crate::config::RuntimePaths;
use crate::models::QueryEnvelope;
use crate::query::query_stmt_types;

#[derive(Debug, Clone, Args)]
pub struct TypesArgs {}

pub fn run(_args: &TypesArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "statements.types";
    let connection = open_connection(COMMAND, runtime_paths)?;
    let stmt_types =
        query_stmt_types(&connection).map_err(|error| query_failure(COMMAND, &error))?;

    let type_count = stmt_types.len();
    let envelope = QueryEnvelope::ok(COMMAND, json!({ "stmt_types": stmt_types }))
        .with_meta("type_count", json!(type_count));
    print_envelope(&envelope)
}
