use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::{command_failure, print_envelope};
use crate::models::{QueryEnvelope, config_json_schema, time_range_json_schema};

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {}

pub fn run(_args: &InspectArgs) -> Result<()> {
    const COMMAND: &str = "inspect.schema";
    let config_schema = serde_json::to_value(config_json_schema()).map_err(|error| {
        command_failure(COMMAND, "schema_encode_failed", &format!("{error:#}"), false)
    })?;
    let time_range_schema = serde_json::to_value(time_range_json_schema()).map_err(|error| {
        command_failure(COMMAND, "schema_encode_failed", &format!("{error:#}"), false)
    })?;

    let envelope = QueryEnvelope::ok(
        COMMAND,
        json!({
            "config": config_schema,
            "time_range": time_range_schema,
        }),
    );
    print_envelope(&envelope)
}
