use crate::error::DeserializingConnectionError;

use super::executor::SqliteExecutor;

pub const IN_MEMORY: &str = ":memory:";

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub apply_wal_pragmas: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            apply_wal_pragmas: false,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY.to_string())
    }

    #[must_use]
    pub fn with_wal_pragmas(mut self, apply_wal_pragmas: bool) -> Self {
        self.apply_wal_pragmas = apply_wal_pragmas;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal_pragmas(mut self, apply_wal_pragmas: bool) -> Self {
        self.opts.apply_wal_pragmas = apply_wal_pragmas;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the connection and wrap it in an executor.
    ///
    /// # Errors
    ///
    /// Returns `DeserializingConnectionError` if opening the database or applying pragmas fails.
    pub async fn build(self) -> Result<SqliteExecutor, DeserializingConnectionError> {
        SqliteExecutor::open(self.finish()).await
    }
}

impl SqliteExecutor {
    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open a `SQLite` database described by `opts`.
    ///
    /// # Errors
    /// Returns `DeserializingConnectionError::ConnectionError` if the database can not be opened.
    pub async fn open(opts: SqliteOptions) -> Result<Self, DeserializingConnectionError> {
        let db_path = opts.db_path;
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(&db_path))
            .await
            .map_err(|e| {
                DeserializingConnectionError::ConnectionError(format!(
                    "sqlite open join error: {e}"
                ))
            })?
            .map_err(|e| {
                DeserializingConnectionError::ConnectionError(format!(
                    "Failed to open SQLite database: {e}"
                ))
            })?;

        let executor = SqliteExecutor::new(conn);
        if opts.apply_wal_pragmas {
            executor
                .with_connection(|conn| {
                    conn.execute_batch("PRAGMA journal_mode = WAL;")
                        .map_err(DeserializingConnectionError::SqliteError)
                })
                .await?;
        }
        Ok(executor)
    }
}
