use serde::de::DeserializeOwned;

use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::transform::ensure_single_value_transformer;

use super::DeserializingQuery;

impl<E: QueryExecutor> DeserializingQuery<'_, '_, E> {
    /// The first column of the first row as `T`.
    ///
    /// No row, a null scalar, or a transformer returning null all yield `None`.
    /// A null scalar short-circuits before the single-value transformer is called.
    ///
    /// # Errors
    /// Returns `SingleValueTransformationMustNotContainRenaming` before the
    /// query runs when the single-value transformer renames, plus executor,
    /// decoding, transformation and denormalization errors.
    pub async fn find_one_from_single_value<T: DeserializeOwned>(
        self,
    ) -> Result<Option<T>, DeserializingConnectionError> {
        if let Some(transformer) = self.single_value_transformer {
            ensure_single_value_transformer(transformer)?;
        }

        let conn = self.conn;
        let value = conn
            .decoding()
            .fetch_one(&self.sql, &self.params, self.decoder_type)
            .await?;
        let Some(mut value) = value.filter(|value| !value.is_null()) else {
            return Ok(None);
        };

        if let Some(transformer) = self.single_value_transformer {
            value = conn.runner().transform_single_value(transformer, value)?;
            if value.is_null() {
                return Ok(None);
            }
        }
        conn.denormalizer().denormalize(value).map(Some)
    }

    /// # Errors
    /// Returns `ElementNotFound` where [`DeserializingQuery::find_one_from_single_value`]
    /// would return `None`, plus every error it returns.
    pub async fn get_one_from_single_value<T: DeserializeOwned>(
        self,
    ) -> Result<T, DeserializingConnectionError> {
        self.find_one_from_single_value()
            .await?
            .ok_or(DeserializingConnectionError::ElementNotFound)
    }
}
