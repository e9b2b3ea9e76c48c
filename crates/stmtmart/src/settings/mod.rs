use anyhow::anyhow;
use rusqlite::{Connection, OptionalExtension, params};

use crate::models::StmtConfig;
use crate::query::error::QueryError;
use crate::store::SETTINGS_TABLE;

pub const SETTING_ENABLED: &str = "stmt_summary_enabled";
pub const SETTING_REFRESH_INTERVAL: &str = "stmt_summary_refresh_interval";
pub const SETTING_HISTORY_SIZE: &str = "stmt_summary_history_size";

// A setting that was never written (or holds an empty value) reads back as
// this sentinel, distinct from a read error.
pub const SETTING_UNSET: i64 = -1;

pub const DEFAULT_REFRESH_INTERVAL: i64 = 1800;
pub const DEFAULT_HISTORY_SIZE: i64 = 24;

pub fn read_int_setting(connection: &Connection, name: &str) -> Result<i64, QueryError> {
    let query = format!("SELECT value FROM {SETTINGS_TABLE} WHERE name = ?1");
    let stored = connection
        .query_row(&query, [name], |row| row.get::<usize, String>(0))
        .optional()
        .map_err(QueryError::store_read)?;

    let Some(raw) = stored else {
        return Ok(SETTING_UNSET);
    };
    if raw.is_empty() {
        return Ok(SETTING_UNSET);
    }
    raw.parse::<i64>().map_err(|_| {
        QueryError::store_read(anyhow!("setting `{name}` holds non-integer value `{raw}`"))
    })
}

pub fn write_setting(connection: &Connection, name: &str, value: &str) -> Result<(), QueryError> {
    let query = format!(
        "INSERT INTO {SETTINGS_TABLE} (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value"
    );
    connection
        .execute(&query, params![name, value])
        .map_err(QueryError::store_write)?;
    Ok(())
}

pub fn read_stmt_config(connection: &Connection) -> Result<StmtConfig, QueryError> {
    let enabled = read_int_setting(connection, SETTING_ENABLED)? != 0;

    let refresh_interval = match read_int_setting(connection, SETTING_REFRESH_INTERVAL)? {
        SETTING_UNSET => DEFAULT_REFRESH_INTERVAL,
        value => value,
    };

    let history_size = match read_int_setting(connection, SETTING_HISTORY_SIZE)? {
        SETTING_UNSET => DEFAULT_HISTORY_SIZE,
        value => value,
    };

    Ok(StmtConfig {
        enabled,
        refresh_interval,
        history_size,
    })
}

// Interval and history size only matter while collection is active, so they
// are written only when the flag is set. The three writes are independent
// statements: a failure after the first leaves the enabled flag persisted.
pub fn write_stmt_config(connection: &Connection, config: &StmtConfig) -> Result<(), QueryError> {
    write_setting(
        connection,
        SETTING_ENABLED,
        if config.enabled { "1" } else { "0" },
    )?;

    if config.enabled {
        write_setting(
            connection,
            SETTING_REFRESH_INTERVAL,
            &config.refresh_interval.to_string(),
        )?;
        write_setting(
            connection,
            SETTING_HISTORY_SIZE,
            &config.history_size.to_string(),
        )?;
    }
    Ok(())
}
