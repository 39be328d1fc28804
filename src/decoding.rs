use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::decoder::{DecoderTypes, decode_row, decode_rows, decode_value};
use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::results::{DecodedRow, ResultSet};
use crate::types::{DecodePolicy, DecoderType, RowValues};

/// Query executor wrapper that decodes declared columns of every returned row.
///
/// "No row" is reported as `None` and never confused with a row of nulls.
#[derive(Debug, Clone)]
pub struct DecodingConnection<E> {
    executor: E,
    decode_policy: DecodePolicy,
}

impl<E: QueryExecutor> DecodingConnection<E> {
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self::with_policy(executor, DecodePolicy::default())
    }

    #[must_use]
    pub fn with_policy(executor: E, decode_policy: DecodePolicy) -> Self {
        Self {
            executor,
            decode_policy,
        }
    }

    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    #[must_use]
    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    async fn select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DeserializingConnectionError> {
        let result_set = self.executor.execute_select(query, params).await?;
        debug!(
            query,
            rows = result_set.len(),
            columns = result_set.column_count(),
            "query executed"
        );
        Ok(result_set)
    }

    /// First column of the first row, decoded when a decoder type is given.
    ///
    /// Returns `Ok(None)` when the query returned no rows. A row whose first
    /// column is null yields `Ok(Some(Value::Null))` unless the decoder maps
    /// null to something else.
    ///
    /// # Errors
    /// Returns executor errors and decoding errors.
    pub async fn fetch_one(
        &self,
        query: &str,
        params: &[RowValues],
        decoder_type: Option<DecoderType>,
    ) -> Result<Option<Value>, DeserializingConnectionError> {
        let result_set = self.select(query, params).await?;
        result_set
            .first_value()
            .map(|value| self.decode_scalar(value, decoder_type))
            .transpose()
    }

    /// First column of every row.
    ///
    /// # Errors
    /// Returns executor errors and decoding errors.
    pub async fn fetch_first_column(
        &self,
        query: &str,
        params: &[RowValues],
        decoder_type: Option<DecoderType>,
    ) -> Result<Vec<Value>, DeserializingConnectionError> {
        let result_set = self.select(query, params).await?;
        result_set
            .first_column()
            .map(|value| self.decode_scalar(value, decoder_type))
            .collect()
    }

    /// # Errors
    /// Returns executor errors and decoding errors.
    pub async fn fetch_associative(
        &self,
        query: &str,
        params: &[RowValues],
        decoder_types: &DecoderTypes,
    ) -> Result<Option<DecodedRow>, DeserializingConnectionError> {
        let result_set = self.select(query, params).await?;
        result_set
            .into_iter()
            .next()
            .map(|row| decode_row(row, decoder_types, self.decode_policy))
            .transpose()
    }

    /// Every row, decoded. An empty result is an empty list.
    ///
    /// # Errors
    /// Returns executor errors and decoding errors.
    pub async fn fetch_all_associative(
        &self,
        query: &str,
        params: &[RowValues],
        decoder_types: &DecoderTypes,
    ) -> Result<Vec<DecodedRow>, DeserializingConnectionError> {
        let result_set = self.select(query, params).await?;
        decode_rows(result_set, decoder_types, self.decode_policy)
    }

    /// Every row, keyed by the string form of its `index_column` value.
    ///
    /// Later rows replace earlier rows with the same index.
    ///
    /// # Errors
    /// Returns `IndexColumnNotFound` when a row has no `index_column`, plus
    /// executor and decoding errors.
    pub async fn fetch_all_associative_indexed(
        &self,
        query: &str,
        params: &[RowValues],
        decoder_types: &DecoderTypes,
        index_column: &str,
    ) -> Result<IndexMap<String, DecodedRow>, DeserializingConnectionError> {
        let rows = self.fetch_all_associative(query, params, decoder_types).await?;
        let mut indexed = IndexMap::with_capacity(rows.len());
        for row in rows {
            let index = match row.get(index_column) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => {
                    return Err(DeserializingConnectionError::IndexColumnNotFound(
                        index_column.to_string(),
                    ));
                }
            };
            indexed.insert(index, row);
        }
        Ok(indexed)
    }

    /// A single native integer. The query must return exactly one row with exactly one column.
    ///
    /// # Errors
    /// Returns `QueryDidNotReturnExactlyOneResult` or `QueryDidNotReturnAnInt`.
    pub async fn fetch_int(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<i64, DeserializingConnectionError> {
        let value = self.fetch_exactly_one(query, params).await?;
        value
            .as_int()
            .copied()
            .ok_or(DeserializingConnectionError::QueryDidNotReturnAnInt)
    }

    /// A single native boolean. `SQLite` integers `0`/`1` count as booleans.
    ///
    /// # Errors
    /// Returns `QueryDidNotReturnExactlyOneResult` or `QueryDidNotReturnABoolean`.
    pub async fn fetch_bool(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<bool, DeserializingConnectionError> {
        let value = self.fetch_exactly_one(query, params).await?;
        value
            .as_bool()
            .copied()
            .ok_or(DeserializingConnectionError::QueryDidNotReturnABoolean)
    }

    /// # Errors
    /// Returns executor errors.
    pub async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError> {
        debug!(query, "executing batch");
        self.executor.execute_batch(query).await
    }

    async fn fetch_exactly_one(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<RowValues, DeserializingConnectionError> {
        let result_set = self.select(query, params).await?;
        if result_set.len() != 1 || result_set.column_count() != 1 {
            return Err(DeserializingConnectionError::QueryDidNotReturnExactlyOneResult);
        }
        result_set
            .first_value()
            .cloned()
            .ok_or(DeserializingConnectionError::QueryDidNotReturnExactlyOneResult)
    }

    fn decode_scalar(
        &self,
        value: &RowValues,
        decoder_type: Option<DecoderType>,
    ) -> Result<Value, DeserializingConnectionError> {
        match decoder_type {
            Some(decoder) => decode_value(value, decoder, self.decode_policy),
            None => Ok(value.to_json()),
        }
    }
}
