use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{open_connection, parse_time, print_envelope, query_failure};
use crate::config::RuntimePaths;
use crate::models::QueryEnvelope;
use crate::query::{query_plan_detail, query_plans};
use crate::store::SqliteColumnResolver;

#[derive(Debug, Clone, Args)]
pub struct PlansArgs {
    #[arg(long, value_name = "TIME")]
    pub begin: String,

    #[arg(long, value_name = "TIME")]
    pub end: String,

    #[arg(long, value_name = "NAME")]
    pub schema_name: String,

    #[arg(long, value_name = "DIGEST")]
    pub digest: String,
}

#[derive(Debug, Clone, Args)]
pub struct PlanDetailArgs {
    #[arg(long, value_name = "TIME")]
    pub begin: String,

    #[arg(long, value_name = "TIME")]
    pub end: String,

    #[arg(long, value_name = "NAME")]
    pub schema_name: String,

    #[arg(long, value_name = "DIGEST")]
    pub digest: String,

    #[arg(long = "plan", value_name = "PLAN_DIGEST")]
    pub plans: Vec<String>,
}

pub fn run_plans(args: &PlansArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "statements.plans";
    let begin_time = parse_time(COMMAND, "begin", &args.begin)?;
    let end_time = parse_time(COMMAND, "end", &args.end)?;

    let connection = open_connection(COMMAND, runtime_paths)?;
    let rows = query_plans(
        &connection,
        &SqliteColumnResolver,
        begin_time,
        end_time,
        &args.schema_name,
        &args.digest,
    )
    .map_err(|error| query_failure(COMMAND, &error))?;

    let row_count = rows.len();
    let envelope = QueryEnvelope::ok(COMMAND, json!({ "rows": rows }))
        .with_meta("row_count", json!(row_count))
        .with_meta("schema_name", json!(args.schema_name))
        .with_meta("digest", json!(args.digest));
    print_envelope(&envelope)
}

pub fn run_plan_detail(args: &PlanDetailArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    const COMMAND: &str = "statements.plan-detail";
    let begin_time = parse_time(COMMAND, "begin", &args.begin)?;
    let end_time = parse_time(COMMAND, "end", &args.end)?;

    let connection = open_connection(COMMAND, runtime_paths)?;
    let row = query_plan_detail(
        &connection,
        &SqliteColumnResolver,
        begin_time,
        end_time,
        &args.schema_name,
        &args.digest,
        &args.plans,
    )
    .map_err(|error| query_failure(COMMAND, &error))?;

    // An empty row means nothing matched; callers check for emptiness.
    let matched = !row.is_empty();
    let envelope = QueryEnvelope::ok(COMMAND, json!({ "row": row }))
        .with_meta("matched", json!(matched))
        .with_meta("plan_filter_count", json!(args.plans.len()));
    print_envelope(&envelope)
}
