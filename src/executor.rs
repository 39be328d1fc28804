use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DeserializingConnectionError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// The raw query collaborator the decoding layer runs on.
///
/// A query that matches nothing must come back as an empty `ResultSet`, never
/// as an error, so "no rows" stays distinct from "a row of nulls".
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes a single SELECT statement and returns the result set.
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DeserializingConnectionError>;

    /// Executes a batch of statements without parameters, e.g. schema setup.
    async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError>;
}

#[async_trait]
impl<E> QueryExecutor for Arc<E>
where
    E: QueryExecutor + ?Sized,
{
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DeserializingConnectionError> {
        (**self).execute_select(query, params).await
    }

    async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError> {
        (**self).execute_batch(query).await
    }
}
