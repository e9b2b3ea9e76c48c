use std::path::PathBuf;

use stmtmart::models::StmtConfig;
use stmtmart::settings::{read_stmt_config, write_stmt_config};
use stmtmart::store::{ensure_store_schema, open_store};

fn temp_db_path(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("stmtmart-{label}-{nanos}.sqlite"))
}

#[test]
fn config_survives_store_reopen() {
    let db_path = temp_db_path("settings-reopen");

    {
        let connection = open_store(&db_path).expect("store should open");
        ensure_store_schema(&connection).expect("schema should create");
        write_stmt_config(
            &connection,
            &StmtConfig {
                enabled: true,
                refresh_interval: 900,
                history_size: 12,
            },
        )
        .expect("config write should succeed");
    }

    let connection = open_store(&db_path).expect("store should reopen");
    ensure_store_schema(&connection).expect("schema ensure should be idempotent");
    let config = read_stmt_config(&connection).expect("config should read");
    assert_eq!(
        config,
        StmtConfig {
            enabled: true,
            refresh_interval: 900,
            history_size: 12,
        }
    );

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn fresh_store_reports_documented_defaults() {
    let db_path = temp_db_path("settings-defaults");

    let connection = open_store(&db_path).expect("store should open");
    ensure_store_schema(&connection).expect("schema should create");
    let config = read_stmt_config(&connection).expect("config should read");
    assert_eq!(config.refresh_interval, 1800);
    assert_eq!(config.history_size, 24);

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn disabling_preserves_previously_stored_tuning_values() {
    let db_path = temp_db_path("settings-disable");

    let connection = open_store(&db_path).expect("store should open");
    ensure_store_schema(&connection).expect("schema should create");
    write_stmt_config(
        &connection,
        &StmtConfig {
            enabled: true,
            refresh_interval: 600,
            history_size: 48,
        },
    )
    .expect("enabled write should succeed");

    write_stmt_config(
        &connection,
        &StmtConfig {
            enabled: false,
            refresh_interval: 1,
            history_size: 1,
        },
    )
    .expect("disabled write should succeed");

    let config = read_stmt_config(&connection).expect("config should read");
    assert!(!config.enabled);
    assert_eq!(
        config.refresh_interval, 600,
        "disabled write must not push tuning values"
    );
    assert_eq!(config.history_size, 48);

    let _ = std::fs::remove_file(&db_path);
}
