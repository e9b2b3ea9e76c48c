use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;

use crate::query::error::QueryError;

pub const STATEMENTS_TABLE: &str = "statements_summary_history";
pub const SETTINGS_TABLE: &str = "global_settings";

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// Summary windows are stored as whole epoch seconds; the collection process
// that appends rows lives outside this crate.
const CREATE_STATEMENTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS statements_summary_history (
    summary_begin_time INTEGER NOT NULL,
    summary_end_time INTEGER NOT NULL,
    schema_name TEXT NOT NULL,
    digest TEXT NOT NULL,
    digest_text TEXT NOT NULL,
    stmt_type TEXT NOT NULL,
    table_names TEXT NOT NULL DEFAULT '',
    plan TEXT NOT NULL DEFAULT '',
    plan_digest TEXT NOT NULL DEFAULT '',
    exec_count INTEGER NOT NULL DEFAULT 0,
    sum_latency INTEGER NOT NULL DEFAULT 0,
    max_latency INTEGER NOT NULL DEFAULT 0,
    min_latency INTEGER NOT NULL DEFAULT 0,
    avg_latency INTEGER NOT NULL DEFAULT 0,
    avg_mem INTEGER NOT NULL DEFAULT 0,
    max_mem INTEGER NOT NULL DEFAULT 0,
    sum_errors INTEGER NOT NULL DEFAULT 0,
    sum_warnings INTEGER NOT NULL DEFAULT 0,
    avg_affected_rows INTEGER NOT NULL DEFAULT 0,
    first_seen INTEGER NOT NULL DEFAULT 0,
    last_seen INTEGER NOT NULL DEFAULT 0,
    CHECK (summary_end_time >= summary_begin_time)
);
"#;

const CREATE_INDEX_WINDOW_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_statements_summary_window
ON statements_summary_history (summary_begin_time, summary_end_time);
"#;

const CREATE_INDEX_FINGERPRINT_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_statements_summary_fingerprint
ON statements_summary_history (schema_name, digest, plan_digest);
"#;

const CREATE_SETTINGS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS global_settings (
    name TEXT NOT NULL PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

#[must_use]
pub fn schema_statements() -> &'static [&'static str] {
    &[
        CREATE_STATEMENTS_TABLE_SQL,
        CREATE_INDEX_WINDOW_SQL,
        CREATE_INDEX_FINGERPRINT_SQL,
        CREATE_SETTINGS_TABLE_SQL,
    ]
}

#[must_use]
pub fn create_schema_sql() -> String {
    schema_statements().join("\n")
}

pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create store parent directory: {}",
                parent.display()
            )
        })?;
    }

    let connection = Connection::open(path)
        .with_context(|| format!("failed to open statement store: {}", path.display()))?;
    register_regexp_function(&connection)?;
    Ok(connection)
}

pub fn ensure_store_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&create_schema_sql())
        .context("failed to create statement store schema")
}

// SQLite ships no REGEXP; `value REGEXP pattern` calls regexp(pattern, value).
// The compiled pattern is cached as aux data per prepared statement, so a
// bound pattern compiles once per query. NULL values never match.
pub fn register_regexp_function(connection: &Connection) -> Result<()> {
    connection
        .create_scalar_function(
            "regexp",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            move |ctx| {
                let pattern: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
                    Ok(Regex::new(vr.as_str()?)?)
                })?;
                let matched = match ctx.get_raw(1) {
                    ValueRef::Null => false,
                    value => {
                        let text = value
                            .as_str()
                            .map_err(|error| rusqlite::Error::UserFunctionError(error.into()))?;
                        pattern.is_match(text)
                    }
                };
                Ok(matched)
            },
        )
        .context("failed to register REGEXP function")
}

pub trait ColumnResolver {
    fn table_columns(
        &self,
        connection: &Connection,
        table: &str,
    ) -> Result<BTreeSet<String>, QueryError>;
}

// Reads the live column set per call; staleness handling stays with the
// store, never with query construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteColumnResolver;

impl ColumnResolver for SqliteColumnResolver {
    fn table_columns(
        &self,
        connection: &Connection,
        table: &str,
    ) -> Result<BTreeSet<String>, QueryError> {
        let pragma_sql = format!("PRAGMA table_info({})", sqlite_single_quoted(table));
        let mut statement = connection
            .prepare(&pragma_sql)
            .map_err(QueryError::resolver)?;
        let column_rows = statement
            .query_map([], |row| row.get::<usize, String>(1))
            .map_err(QueryError::resolver)?;

        let mut columns = BTreeSet::new();
        for column in column_rows {
            columns.insert(column.map_err(QueryError::resolver)?);
        }
        if columns.is_empty() {
            return Err(QueryError::Resolver(format!(
                "table `{table}` has no columns or does not exist"
            )));
        }
        Ok(columns)
    }
}

fn sqlite_single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{
        ColumnResolver, STATEMENTS_TABLE, SqliteColumnResolver, ensure_store_schema,
        register_regexp_function,
    };
    use crate::query::error::QueryError;

    fn test_connection() -> Connection {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        register_regexp_function(&connection).expect("regexp function should register");
        ensure_store_schema(&connection).expect("schema should create");
        connection
    }

    fn regexp_matches(connection: &Connection, value: &str, pattern: &str) -> bool {
        connection
            .query_row("SELECT ?1 REGEXP ?2", [value, pattern], |row| {
                row.get::<usize, i64>(0)
            })
            .expect("regexp query should run")
            != 0
    }

    #[test]
    fn regexp_function_enforces_word_boundaries() {
        let connection = test_connection();
        assert!(regexp_matches(&connection, "tpcc.orders", "\\btpcc\\."));
        assert!(!regexp_matches(&connection, "tpccx.orders", "\\btpcc\\."));
        assert!(regexp_matches(
            &connection,
            "test.t,tpcc.orders",
            "\\btpcc\\."
        ));
    }

    #[test]
    fn regexp_function_treats_null_as_no_match() {
        let connection = test_connection();
        let matched = connection
            .query_row("SELECT NULL REGEXP 'x'", [], |row| row.get::<usize, i64>(0))
            .expect("regexp query should run");
        assert_eq!(matched, 0);
    }

    #[test]
    fn regexp_function_rejects_invalid_patterns() {
        let connection = test_connection();
        let result = connection.query_row("SELECT 'abc' REGEXP '('", [], |row| {
            row.get::<usize, i64>(0)
        });
        assert!(result.is_err(), "unbalanced pattern should fail the query");
    }

    #[test]
    fn schema_is_idempotent() {
        let connection = test_connection();
        ensure_store_schema(&connection).expect("second schema ensure should succeed");
    }

    #[test]
    fn resolver_reports_live_statement_columns() {
        let connection = test_connection();
        let columns = SqliteColumnResolver
            .table_columns(&connection, STATEMENTS_TABLE)
            .expect("statement columns should resolve");

        for expected in [
            "summary_begin_time",
            "summary_end_time",
            "schema_name",
            "digest",
            "digest_text",
            "stmt_type",
            "table_names",
            "plan",
            "plan_digest",
            "sum_latency",
        ] {
            assert!(columns.contains(expected), "missing column {expected}");
        }
    }

    #[test]
    fn resolver_sees_columns_added_after_creation() {
        let connection = test_connection();
        connection
            .execute(
                "ALTER TABLE statements_summary_history ADD COLUMN sum_backoff_times INTEGER",
                [],
            )
            .expect("alter table should succeed");

        let columns = SqliteColumnResolver
            .table_columns(&connection, STATEMENTS_TABLE)
            .expect("statement columns should resolve");
        assert!(columns.contains("sum_backoff_times"));
    }

    #[test]
    fn resolver_fails_for_missing_table() {
        let connection = test_connection();
        let error = SqliteColumnResolver
            .table_columns(&connection, "no_such_table")
            .expect_err("missing table should not resolve");
        assert!(matches!(error, QueryError::Resolver(_)));
    }
}
