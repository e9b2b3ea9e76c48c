pub mod builder;
pub mod error;
pub mod projection;

use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

use crate::models::{StatementFilter, StatementRow, TimeRange};
use crate::query::builder::{Predicate, SelectBuilder};
use crate::query::error::QueryError;
use crate::query::projection::resolve_projection;
use crate::store::{ColumnResolver, STATEMENTS_TABLE};

// Columns probed by free-text search, OR-combined per term.
pub const SEARCHABLE_COLUMNS: &[&str] =
    &["digest_text", "digest", "schema_name", "table_names", "plan"];

// One result row per statement fingerprint, aggregated across plans.
const STATEMENT_GROUP_KEYS: &[&str] = &["schema_name", "digest"];

// One result row per execution plan of a single fingerprint.
const PLAN_GROUP_KEYS: &[&str] = &["plan_digest"];

pub const PLAN_LIST_FIELDS: &[&str] = &[
    "plan_digest",
    "schema_name",
    "digest_text",
    "digest",
    "sum_latency",
    "max_latency",
    "min_latency",
    "avg_latency",
    "exec_count",
    "avg_mem",
    "max_mem",
];

pub fn query_time_ranges(connection: &Connection) -> Result<Vec<TimeRange>, QueryError> {
    let query = format!(
        "SELECT DISTINCT summary_begin_time AS begin_time, summary_end_time AS end_time
         FROM {STATEMENTS_TABLE}
         ORDER BY begin_time DESC, end_time DESC"
    );
    let mut statement = connection.prepare(&query).map_err(QueryError::store_read)?;
    let rows = statement
        .query_map([], |row| {
            Ok(TimeRange {
                begin_time: row.get(0)?,
                end_time: row.get(1)?,
            })
        })
        .map_err(QueryError::store_read)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(QueryError::store_read)
}

pub fn query_stmt_types(connection: &Connection) -> Result<Vec<String>, QueryError> {
    let query =
        format!("SELECT DISTINCT stmt_type FROM {STATEMENTS_TABLE} ORDER BY stmt_type ASC");
    let mut statement = connection.prepare(&query).map_err(QueryError::store_read)?;
    let rows = statement
        .query_map([], |row| row.get::<usize, String>(0))
        .map_err(QueryError::store_read)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(QueryError::store_read)
}

pub fn query_statements(
    connection: &Connection,
    resolver: &dyn ColumnResolver,
    filter: &StatementFilter,
) -> Result<Vec<StatementRow>, QueryError> {
    let columns = resolver.table_columns(connection, STATEMENTS_TABLE)?;
    let projection = resolve_projection(&columns, &filter.fields, STATEMENT_GROUP_KEYS)?;

    let mut builder = SelectBuilder::new(STATEMENTS_TABLE, projection)
        .filter(window_predicate(filter.begin_time, filter.end_time))
        .group_by("schema_name, digest")
        .order_by("SUM(sum_latency) DESC");

    if !filter.schemas.is_empty() {
        builder = builder.filter(schema_match_predicate(&filter.schemas));
    }
    if !filter.stmt_types.is_empty() {
        builder = builder.filter(Predicate::in_set("stmt_type", &filter.stmt_types));
    }
    // Terms AND-combine: every term must hit at least one searchable column.
    for term in filter.text.to_lowercase().split_whitespace() {
        builder = builder.filter(text_term_predicate(term));
    }

    builder.fetch_all(connection)
}

pub fn query_plans(
    connection: &Connection,
    resolver: &dyn ColumnResolver,
    begin_time: i64,
    end_time: i64,
    schema_name: &str,
    digest: &str,
) -> Result<Vec<StatementRow>, QueryError> {
    let columns = resolver.table_columns(connection, STATEMENTS_TABLE)?;
    let fields: Vec<String> = PLAN_LIST_FIELDS
        .iter()
        .map(|field| (*field).to_string())
        .collect();
    let projection = resolve_projection(&columns, &fields, PLAN_GROUP_KEYS)?;

    SelectBuilder::new(STATEMENTS_TABLE, projection)
        .filter(window_predicate(begin_time, end_time))
        .filter(Predicate::new(
            "schema_name = ?",
            vec![SqlValue::Text(schema_name.to_string())],
        ))
        .filter(Predicate::new(
            "digest = ?",
            vec![SqlValue::Text(digest.to_string())],
        ))
        .group_by("plan_digest")
        .fetch_all(connection)
}

pub fn query_plan_detail(
    connection: &Connection,
    resolver: &dyn ColumnResolver,
    begin_time: i64,
    end_time: i64,
    schema_name: &str,
    digest: &str,
    plans: &[String],
) -> Result<StatementRow, QueryError> {
    let columns = resolver.table_columns(connection, STATEMENTS_TABLE)?;
    let projection = resolve_projection(&columns, &[], &[])?;

    let mut builder = SelectBuilder::new(STATEMENTS_TABLE, projection)
        .filter(window_predicate(begin_time, end_time))
        .filter(Predicate::new(
            "schema_name = ?",
            vec![SqlValue::Text(schema_name.to_string())],
        ))
        .filter(Predicate::new(
            "digest = ?",
            vec![SqlValue::Text(digest.to_string())],
        ));
    if !plans.is_empty() {
        builder = builder.filter(Predicate::in_set("plan_digest", plans));
    }

    builder.fetch_first(connection)
}

// Both bounds inclusive: the summary window must sit fully inside the
// requested range, compared at one-second resolution.
fn window_predicate(begin_time: i64, end_time: i64) -> Predicate {
    Predicate::new(
        "summary_begin_time >= ? AND summary_end_time <= ?",
        vec![SqlValue::Integer(begin_time), SqlValue::Integer(end_time)],
    )
}

// One alternation of `\b<schema>\.` patterns; the escaped name plus the
// trailing separator keeps `tpcc` from matching `tpccx`.
fn schema_match_predicate(schemas: &[String]) -> Predicate {
    let pattern = schemas
        .iter()
        .map(|schema| format!("\\b{}\\.", regex::escape(schema)))
        .collect::<Vec<_>>()
        .join("|");
    Predicate::new("table_names REGEXP ?", vec![SqlValue::Text(pattern)])
}

fn text_term_predicate(term: &str) -> Predicate {
    let fragment = SEARCHABLE_COLUMNS
        .iter()
        .map(|column| format!("LOWER({column}) REGEXP ?"))
        .collect::<Vec<_>>()
        .join(" OR ");
    Predicate::new(
        fragment,
        vec![SqlValue::Text(term.to_string()); SEARCHABLE_COLUMNS.len()],
    )
}
