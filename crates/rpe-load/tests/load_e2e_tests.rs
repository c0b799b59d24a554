//! End-to-end tests for a full load run
//!
//! Each test lays out a small rpe directory (layouts, processed data) in a
//! temporary directory and runs the pipeline against a database file in it.

use chrono::{NaiveDate, NaiveDateTime};
use rpe_load::config::LoadConfig;
use rpe_load::db::Database;
use rpe_load::manifest::Dataset;
use rpe_load::{pipeline, LoadError};
use rusqlite::types::Value as SqlValue;
use std::path::Path;
use tempfile::TempDir;

const TAX_LAYOUT: &str = "FIELD\tNAME\tTYPE\tDATA\tDESCRIPTION\n\
    1\tSSN\tTEXT\t1\tsocial security number\n\
    2\tTAX_YEAR\tNUMBER\t1\tyear of return\n\
    3\tAMOUNT\tNUMBER\t1\tamount owed\n\
    4\tFILED_DT\tDATE\t1\tfiling date\n\
    5\tPREPARER\tTEXT\t0\tnot exported\n";

const TAX_DATA: &str = "SSN|TAX_YEAR|AMOUNT|FILED_DT|VALID_SSN\n\
    111-22-3333|2022|1500.25|2023-01-15 08:30:00|1\n\
    444-55-6666|2022|N/A|N/A|0\n\
    777-88-9999|2021|0|2022-04-15 17:00:00|1\n";

const CREDIT_LAYOUT: &str = "NAME\tTYPE\tDATA\n\
    SSN\tTEXT\t1\n\
    SCORE\tNUMBER\t1\n\
    BUREAU\tTEXT\t0\n";

const CREDIT_DATA: &str = "SSN|SCORE\n\
    111-22-3333|712\n\
    444-55-6666|640\n";

// ============================================================================
// Helpers
// ============================================================================

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Standard rpe directory with both datasets at their default locations
fn rpe_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "layouts/tax_layout.tsv", TAX_LAYOUT);
    write(dir.path(), "layouts/credit_score_layout.tsv", CREDIT_LAYOUT);
    write(dir.path(), "data/processed/data/tax.txt", TAX_DATA);
    write(dir.path(), "data/processed/data/credit_scores.txt", CREDIT_DATA);
    dir
}

fn config_for(dir: &Path) -> LoadConfig {
    let mut config = LoadConfig::default();
    config.set_base_dir(dir);
    config
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_tables_follow_layouts() {
    let dir = rpe_dir();
    let config = config_for(dir.path());
    pipeline::run(&config).unwrap();

    let db = Database::open(config.database_path()).unwrap();
    assert_eq!(
        db.table_columns("tax").unwrap(),
        vec!["RECORD_ID", "SSN", "TAX_YEAR", "AMOUNT", "FILED_DT", "VALID_SSN", "IMPORT_DT"]
    );
    assert_eq!(
        db.table_columns("credit_scores").unwrap(),
        vec!["RECORD_ID", "SSN", "SCORE", "VALID_SSN", "IMPORT_DT"]
    );
}

#[test]
fn test_empty_layout_creates_fixed_columns() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "empty_layout.tsv", "NAME\tTYPE\tDATA\n");
    write(dir.path(), "empty.txt", "VALID_SSN\n1\n0\n");

    let mut config = config_for(dir.path());
    config.datasets = vec![Dataset::new("empty", "empty_layout.tsv", "empty.txt")];
    let report = pipeline::run(&config).unwrap();

    let db = Database::open(config.database_path()).unwrap();
    assert_eq!(
        db.table_columns("empty").unwrap(),
        vec!["RECORD_ID", "VALID_SSN", "IMPORT_DT"]
    );
    assert_eq!(report.total_rows(), 2);
}

// ============================================================================
// Load Tests
// ============================================================================

#[test]
fn test_round_trip_values() {
    let dir = rpe_dir();
    let config = config_for(dir.path());
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.tables[0].table, "tax");
    assert_eq!(report.tables[0].rows, 3);
    assert_eq!(report.tables[0].timestamps_coerced, 2);
    assert_eq!(report.tables[1].rows, 2);

    let db = Database::open(config.database_path()).unwrap();
    let conn = db.connection();
    assert_eq!(db.row_count("tax").unwrap(), 3);
    assert_eq!(db.row_count("credit_scores").unwrap(), 2);

    // Timestamps come back as timestamps
    let filed: NaiveDateTime = conn
        .query_row("SELECT FILED_DT FROM tax WHERE SSN = '111-22-3333'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(filed, timestamp(2023, 1, 15, 8, 30, 0));

    // Non-matching strings are stored verbatim, whatever the column type
    let (amount, filed): (SqlValue, SqlValue) = conn
        .query_row(
            "SELECT AMOUNT, FILED_DT FROM tax WHERE SSN = '444-55-6666'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(amount, SqlValue::Text("N/A".to_string()));
    assert_eq!(filed, SqlValue::Text("N/A".to_string()));

    // Numeric text lands in numeric columns as numbers
    let amount: f64 = conn
        .query_row("SELECT AMOUNT FROM tax WHERE SSN = '111-22-3333'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(amount, 1500.25);

    // Trailer columns
    let (valid, missing_import): (i64, i64) = conn
        .query_row(
            "SELECT SUM(VALID_SSN), SUM(IMPORT_DT IS NULL) FROM tax",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(valid, 2);
    assert_eq!(missing_import, 0);

    let ids: Vec<i64> = conn
        .prepare("SELECT RECORD_ID FROM credit_scores ORDER BY RECORD_ID")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_rerun_replaces_tables() {
    let dir = rpe_dir();
    let config = config_for(dir.path());

    let first = pipeline::run(&config).unwrap();
    let second = pipeline::run(&config).unwrap();
    assert_eq!(first, second);

    let db = Database::open(config.database_path()).unwrap();
    assert_eq!(db.row_count("tax").unwrap(), 3);
    assert_eq!(db.row_count("credit_scores").unwrap(), 2);

    // Record ids restart with the recreated table
    let max_id: i64 = db
        .connection()
        .query_row("SELECT MAX(RECORD_ID) FROM tax", [], |row| row.get(0))
        .unwrap();
    assert_eq!(max_id, 3);
}

#[test]
fn test_rejected_row_aborts_run() {
    let dir = rpe_dir();
    // Header column that the layout never declared
    write(
        dir.path(),
        "data/processed/data/credit_scores.txt",
        "SSN|SCORE|BUREAU\n111-22-3333|712|EQ\n",
    );

    let config = config_for(dir.path());
    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, LoadError::Database(_)));

    // Datasets before the failing one stay loaded
    let db = Database::open(config.database_path()).unwrap();
    assert_eq!(db.row_count("tax").unwrap(), 3);
    assert_eq!(db.row_count("credit_scores").unwrap(), 0);
}

#[test]
fn test_missing_data_file() {
    let dir = rpe_dir();
    std::fs::remove_file(dir.path().join("data/processed/data/tax.txt")).unwrap();

    let err = pipeline::run(&config_for(dir.path())).unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound(ref p) if p.ends_with("tax.txt")));
}
