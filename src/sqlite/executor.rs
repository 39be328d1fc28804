use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;
use super::query::build_result_set;

pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// `QueryExecutor` over a single shared `rusqlite` connection.
///
/// rusqlite is blocking, so every statement runs on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: SharedSqliteConnection,
}

impl SqliteExecutor {
    #[must_use]
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self::from_shared(Arc::new(Mutex::new(conn)))
    }

    #[must_use]
    pub fn from_shared(conn: SharedSqliteConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn conn_handle(&self) -> SharedSqliteConnection {
        Arc::clone(&self.conn)
    }

    /// Run `func` against the raw connection on the blocking pool.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `ExecutionError` if the blocking task panicked.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, DeserializingConnectionError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, DeserializingConnectionError>
            + Send
            + 'static,
        R: Send + 'static,
    {
        run_blocking(self.conn_handle(), func).await
    }
}

impl fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteExecutor").finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, DeserializingConnectionError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, DeserializingConnectionError>
        + Send
        + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| {
        DeserializingConnectionError::ExecutionError(format!(
            "sqlite spawn_blocking join error: {e}"
        ))
    })?
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DeserializingConnectionError> {
        debug!(backend = "sqlite", params = params.len(), "executing select");
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&sql_owned)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await
    }

    async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError> {
        debug!(backend = "sqlite", "executing batch");
        let sql_owned = query.to_owned();
        self.with_connection(move |conn| {
            conn.execute_batch(&sql_owned)?;
            Ok(())
        })
        .await
    }
}
