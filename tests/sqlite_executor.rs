#![cfg(feature = "sqlite")]

use deserializing_connection::prelude::*;
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, Deserialize, PartialEq)]
struct Reading {
    id: i64,
    label: String,
    value: f64,
    raw: Option<Vec<u8>>,
}

#[tokio::test]
async fn file_backed_database_with_wal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("readings.db").to_string_lossy().into_owned();

    let executor = SqliteExecutor::builder(path.clone())
        .wal_pragmas(true)
        .build()
        .await?;
    executor
        .execute_batch(
            "CREATE TABLE readings (
                 id INTEGER PRIMARY KEY,
                 label TEXT NOT NULL,
                 value REAL NOT NULL,
                 raw BLOB
             );
             INSERT INTO readings VALUES (1, 'a', 1.5, x'0102'), (2, 'b', 2.0, NULL);",
        )
        .await?;

    let mode = executor.execute_select("PRAGMA journal_mode", &[]).await?;
    assert_eq!(mode.first_value().and_then(RowValues::as_text), Some("wal"));

    // A second executor on the same file sees the committed rows.
    let reopened = SqliteExecutor::open(SqliteOptions::new(path)).await?;
    let conn = DeserializingConnection::new(reopened, DeserializingOptions::default());
    let readings: Vec<Reading> = conn
        .query("SELECT id, label, value, raw FROM readings WHERE value >= ?1 ORDER BY id")
        .params(&[RowValues::Float(1.0)])
        .find_array()
        .await?;
    assert_eq!(
        readings,
        vec![
            Reading { id: 1, label: "a".into(), value: 1.5, raw: Some(vec![1, 2]) },
            Reading { id: 2, label: "b".into(), value: 2.0, raw: None },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn empty_select_keeps_column_names() -> Result<(), Box<dyn std::error::Error>> {
    let executor = SqliteOptions::in_memory();
    let executor = SqliteExecutor::open(executor).await?;
    let result = executor
        .execute_select("SELECT 1 AS one, 'two' AS two WHERE ?1", &[RowValues::Bool(false)])
        .await?;
    assert!(result.is_empty());
    assert_eq!(
        result.get_column_names().map(|names| names.as_slice().to_vec()),
        Some(vec!["one".to_string(), "two".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn invalid_sql_surfaces_the_driver_error() -> Result<(), Box<dyn std::error::Error>> {
    let executor = SqliteExecutor::open(SqliteOptions::in_memory()).await?;
    let err = executor
        .execute_select("SELEKT 1", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::SqliteError(_)));
    Ok(())
}
