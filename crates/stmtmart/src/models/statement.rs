use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StmtConfig {
    pub enabled: bool,
    pub refresh_interval: i64,
    pub history_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeRange {
    pub begin_time: i64,
    pub end_time: i64,
}

// Row shape is decided per query by the validated projection; keys are always
// a subset of the live column set.
pub type StatementRow = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFilter {
    pub begin_time: i64,
    pub end_time: i64,
    pub schemas: Vec<String>,
    pub stmt_types: Vec<String>,
    pub text: String,
    pub fields: Vec<String>,
}

#[must_use]
pub fn config_json_schema() -> schemars::Schema {
    schemars::schema_for!(StmtConfig)
}

#[must_use]
pub fn time_range_json_schema() -> schemars::Schema {
    schemars::schema_for!(TimeRange)
}
