use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{open_connection, print_envelope, query_failure};
use crate::config::RuntimePaths;
use crate::models::QueryEnvelope;
use crate::query::query_time_ranges;

#[derive(Debug, Clone, Args)]
pub struct RangesArgs {}

pub fn run(_args: &RangesArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "statements.ranges";
    let connection = open_connection(COMMAND, runtime_paths)?;
    let ranges =
        query_time_ranges(&connection).map_err(|error| query_failure(COMMAND, &error))?;

    let range_count = ranges.len();
    let envelope = QueryEnvelope::ok(COMMAND, json!({ "time_ranges": ranges }))
        .with_meta("range_count", json!(range_count));
    print_envelope(&envelope)
}
