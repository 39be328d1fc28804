use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DeserializingConnectionError;
use crate::results::DecodedRow;

/// Converts decoded trees into typed values and back, through serde.
///
/// Scalar wrappers (`#[serde(transparent)]` newtypes or custom
/// `Deserialize`/`Serialize` impls), list wrappers and plain structs all go
/// through the same path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedDenormalizer;

impl TypedDenormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    /// Returns `Denormalization` naming the target type when the tree does not fit it.
    pub fn denormalize<T: DeserializeOwned>(
        &self,
        data: Value,
    ) -> Result<T, DeserializingConnectionError> {
        serde_json::from_value(data).map_err(|source| {
            DeserializingConnectionError::Denormalization {
                target: std::any::type_name::<T>(),
                source,
            }
        })
    }

    /// # Errors
    /// See [`TypedDenormalizer::denormalize`].
    pub fn denormalize_row<T: DeserializeOwned>(
        &self,
        row: DecodedRow,
    ) -> Result<T, DeserializingConnectionError> {
        self.denormalize(Value::Object(row))
    }

    /// # Errors
    /// Fails on the first row that does not fit `T`.
    pub fn denormalize_array<T: DeserializeOwned>(
        &self,
        rows: Vec<DecodedRow>,
    ) -> Result<Vec<T>, DeserializingConnectionError> {
        rows.into_iter().map(|row| self.denormalize_row(row)).collect()
    }

    /// # Errors
    /// Returns `Normalization` when the value's `Serialize` impl fails.
    pub fn normalize<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Value, DeserializingConnectionError> {
        serde_json::to_value(value).map_err(DeserializingConnectionError::Normalization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(transparent)]
    struct Limit(u32);

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Search {
        search_term: String,
        limit: Limit,
    }

    #[test]
    fn denormalizes_scalar_wrappers_inside_structs() {
        let search: Search = TypedDenormalizer
            .denormalize(json!({"searchTerm": "rust", "limit": 10}))
            .unwrap();
        assert_eq!(
            search,
            Search {
                search_term: "rust".into(),
                limit: Limit(10)
            }
        );
        assert_eq!(
            TypedDenormalizer.normalize(&search).unwrap(),
            json!({"searchTerm": "rust", "limit": 10})
        );
    }

    #[test]
    fn reports_target_type_on_mismatch() {
        let err = TypedDenormalizer
            .denormalize::<Limit>(json!("ten"))
            .unwrap_err();
        match err {
            DeserializingConnectionError::Denormalization { target, .. } => {
                assert!(target.ends_with("Limit"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
