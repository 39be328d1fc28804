use async_trait::async_trait;
use tokio_postgres::Client;
use tracing::debug;

use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;
use super::query::build_result_set_from_rows;

#[async_trait]
impl QueryExecutor for Client {
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DeserializingConnectionError> {
        debug!(backend = "postgres", params = params.len(), "executing select");
        let stmt = self.prepare(query).await.map_err(|e| {
            DeserializingConnectionError::ExecutionError(format!("postgres prepare error: {e}"))
        })?;
        let converted = Params::convert(params);
        let rows = self.query(&stmt, converted.as_refs()).await.map_err(|e| {
            DeserializingConnectionError::ExecutionError(format!("postgres select error: {e}"))
        })?;
        let column_names = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        build_result_set_from_rows(column_names, &rows)
    }

    async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError> {
        debug!(backend = "postgres", "executing batch");
        self.batch_execute(query).await?;
        Ok(())
    }
}
