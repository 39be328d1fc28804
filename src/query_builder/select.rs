use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::results::DecodedRow;

use super::{DenormalizedRows, DeserializingQuery};

impl<E: QueryExecutor> DeserializingQuery<'_, '_, E> {
    /// Zero or one row as `T`; rows past the first are ignored.
    ///
    /// # Errors
    /// Returns executor, decoding, transformation and denormalization errors.
    pub async fn find_one<T: DeserializeOwned>(
        self,
    ) -> Result<Option<T>, DeserializingConnectionError> {
        let conn = self.conn;
        let Some(mut row) = conn
            .decoding()
            .fetch_associative(&self.sql, &self.params, &self.decoder_types)
            .await?
        else {
            return Ok(None);
        };
        if let Some(transformers) = self.transformers {
            conn.runner().run_transformations(&mut row, transformers)?;
        }
        conn.denormalizer().denormalize_row(row).map(Some)
    }

    /// Exactly one row as `T`.
    ///
    /// # Errors
    /// Returns `ElementNotFound` when the query matched nothing, plus every
    /// error [`DeserializingQuery::find_one`] returns.
    pub async fn get_one<T: DeserializeOwned>(self) -> Result<T, DeserializingConnectionError> {
        self.find_one()
            .await?
            .ok_or(DeserializingConnectionError::ElementNotFound)
    }

    /// Every row as `T`. An empty result is an empty list.
    ///
    /// # Errors
    /// Returns executor, decoding, transformation and denormalization errors.
    pub async fn find_array<T: DeserializeOwned>(
        self,
    ) -> Result<Vec<T>, DeserializingConnectionError> {
        let conn = self.conn;
        let rows = self.fetch_transformed_rows().await?;
        conn.denormalizer().denormalize_array(rows)
    }

    /// Every row as `T`, keyed by `index`.
    ///
    /// `index` may return any serializable value, but it must normalize to a
    /// string. Later elements replace earlier elements with the same key.
    ///
    /// # Errors
    /// Returns `IndexMustBeString` when an index is not a string; no partial
    /// map is returned. Also returns every error [`DeserializingQuery::find_array`] returns.
    pub async fn find_array_indexed<T, I, F>(
        self,
        index: F,
    ) -> Result<IndexMap<String, T>, DeserializingConnectionError>
    where
        T: DeserializeOwned,
        I: Serialize,
        F: Fn(&T) -> I,
    {
        let denormalizer = *self.conn.denormalizer();
        let elements: Vec<T> = self.find_array().await?;

        let mut indexed = IndexMap::with_capacity(elements.len());
        for element in elements {
            let key = match denormalizer.normalize(&index(&element))? {
                Value::String(key) => key,
                other => {
                    return Err(DeserializingConnectionError::IndexMustBeString(
                        other.to_string(),
                    ));
                }
            };
            indexed.insert(key, element);
        }
        Ok(indexed)
    }

    /// Every row as `T`, denormalized one at a time as the iterator is consumed.
    ///
    /// All rows are fetched and transformed before this returns.
    ///
    /// # Errors
    /// Returns executor, decoding and transformation errors. Denormalization
    /// errors are yielded by the iterator.
    pub async fn find_generator<T: DeserializeOwned>(
        self,
    ) -> Result<DenormalizedRows<T>, DeserializingConnectionError> {
        let denormalizer = *self.conn.denormalizer();
        let rows = self.fetch_transformed_rows().await?;
        Ok(DenormalizedRows::new(rows, denormalizer))
    }

    async fn fetch_transformed_rows(self) -> Result<Vec<DecodedRow>, DeserializingConnectionError> {
        let conn = self.conn;
        let mut rows = conn
            .decoding()
            .fetch_all_associative(&self.sql, &self.params, &self.decoder_types)
            .await?;
        if let Some(transformers) = self.transformers {
            conn.runner().run_transformations_on_rows(&mut rows, transformers)?;
        }
        Ok(rows)
    }
}
