use std::collections::HashSet;

use super::rule::ResultTransformer;
use crate::error::DeserializingConnectionError;

/// Ordered transformers for one query. Later transformers see the effects of earlier ones.
///
/// No transformer's final key segment may equal another transformer's rename
/// target, since both would write to the same key.
#[derive(Clone, Debug, Default)]
pub struct ResultTransformers {
    transformers: Vec<ResultTransformer>,
}

impl ResultTransformers {
    /// # Errors
    /// Returns `ConflictBetweenKeysAndRenameTo` naming the first conflicting key.
    pub fn new(transformers: Vec<ResultTransformer>) -> Result<Self, DeserializingConnectionError> {
        let property_names: HashSet<&str> = transformers
            .iter()
            .map(|transformer| transformer.key().last_segment())
            .collect();

        if let Some(conflict) = transformers
            .iter()
            .filter_map(ResultTransformer::rename_to)
            .find(|rename_to| property_names.contains(rename_to))
        {
            return Err(DeserializingConnectionError::ConflictBetweenKeysAndRenameTo(
                conflict.to_string(),
            ));
        }

        Ok(Self { transformers })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultTransformer> {
        self.transformers.iter()
    }
}

impl TryFrom<Vec<ResultTransformer>> for ResultTransformers {
    type Error = DeserializingConnectionError;

    fn try_from(transformers: Vec<ResultTransformer>) -> Result<Self, Self::Error> {
        Self::new(transformers)
    }
}

impl<'a> IntoIterator for &'a ResultTransformers {
    type Item = &'a ResultTransformer;
    type IntoIter = std::slice::Iter<'a, ResultTransformer>;

    fn into_iter(self) -> Self::IntoIter {
        self.transformers.iter()
    }
}
