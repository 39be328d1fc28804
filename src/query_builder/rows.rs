use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::denormalizer::TypedDenormalizer;
use crate::error::DeserializingConnectionError;
use crate::results::DecodedRow;

/// Lazily denormalized rows.
///
/// The rows are already fetched and transformed; each one is denormalized only
/// when the iterator reaches it. Single pass, not restartable.
pub struct DenormalizedRows<T> {
    rows: std::vec::IntoIter<DecodedRow>,
    denormalizer: TypedDenormalizer,
    target: PhantomData<fn() -> T>,
}

impl<T> DenormalizedRows<T> {
    pub(crate) fn new(rows: Vec<DecodedRow>, denormalizer: TypedDenormalizer) -> Self {
        Self {
            rows: rows.into_iter(),
            denormalizer,
            target: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Iterator for DenormalizedRows<T> {
    type Item = Result<T, DeserializingConnectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(self.denormalizer.denormalize_row(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<T: DeserializeOwned> ExactSizeIterator for DenormalizedRows<T> {}

impl<T: DeserializeOwned> FusedIterator for DenormalizedRows<T> {}

impl<T> fmt::Debug for DenormalizedRows<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenormalizedRows")
            .field("remaining", &self.rows.len())
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    fn row(value: serde_json::Value) -> DecodedRow {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn denormalizes_one_row_per_step() {
        let mut rows: DenormalizedRows<Item> = DenormalizedRows::new(
            vec![row(json!({"id": 1})), row(json!({"id": "bad"})), row(json!({"id": 3}))],
            TypedDenormalizer,
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.next().unwrap().unwrap(), Item { id: 1 });
        assert!(rows.next().unwrap().unwrap_err().is_data_error());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.next().unwrap().unwrap(), Item { id: 3 });
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }
}
