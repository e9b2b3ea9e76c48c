use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{open_connection, parse_time, print_envelope, query_failure};
use crate::config::RuntimePaths;
use crate::models::{QueryEnvelope, StatementFilter};
use crate::query::query_statements;
use crate::store::SqliteColumnResolver;

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long, value_name = "TIME")]
    pub begin: String,

    #[arg(long, value_name = "TIME")]
    pub end: String,

    #[arg(long = "schema", value_name = "NAME")]
    pub schemas: Vec<String>,

    #[arg(long = "stmt-type", value_name = "TYPE")]
    pub stmt_types: Vec<String>,

    #[arg(long, value_name = "TEXT", default_value = "")]
    pub text: String,

    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,
}

pub fn run(args: &SearchArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "statements.search";
    let begin_time = parse_time(COMMAND, "begin", &args.begin)?;
    let end_time = parse_time(COMMAND, "end", &args.end)?;

    let connection = open_connection(COMMAND, runtime_paths)?;
    let filter = StatementFilter {
        begin_time,
        end_time,
        schemas: args.schemas.clone(),
        stmt_types: args.stmt_types.clone(),
        text: args.text.clone(),
        fields: args.fields.clone(),
    };
    let rows = query_statements(&connection, &SqliteColumnResolver, &filter)
        .map_err(|error| query_failure(COMMAND, &error))?;

    let row_count = rows.len();
    let envelope = QueryEnvelope::ok(COMMAND, json!({ "rows": rows }))
        .with_meta("row_count", json!(row_count))
        .with_meta("begin_time", json!(begin_time))
        .with_meta("end_time", json!(end_time))
        .with_meta("schema_count", json!(args.schemas.len()))
        .with_meta("stmt_type_count", json!(args.stmt_types.len()))
        .with_meta("field_count", json!(args.fields.len()));
    print_envelope(&envelope)
}
