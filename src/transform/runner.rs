use serde_json::Value;
use tracing::{debug, trace};

use super::key::ARRAY_KEY_IDENTIFIER;
use super::rule::ResultTransformer;
use super::set::ResultTransformers;
use crate::denormalizer::TypedDenormalizer;
use crate::error::DeserializingConnectionError;
use crate::results::DecodedRow;
use crate::types::MissingKeyPolicy;

/// Applies result transformers to decoded rows, in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultTransformerRunner {
    denormalizer: TypedDenormalizer,
    missing_key_policy: MissingKeyPolicy,
}

impl ResultTransformerRunner {
    #[must_use]
    pub fn new(denormalizer: TypedDenormalizer, missing_key_policy: MissingKeyPolicy) -> Self {
        Self {
            denormalizer,
            missing_key_policy,
        }
    }

    #[must_use]
    pub fn missing_key_policy(&self) -> MissingKeyPolicy {
        self.missing_key_policy
    }

    /// Run every transformer against `result`, in order.
    ///
    /// Each transformer gets the whole row as it was before that transformer
    /// started, so a function reading sibling or top-level data never sees a
    /// half-applied transformer.
    ///
    /// # Errors
    /// Returns `TransformerKeyNotFound` for a missing key (under
    /// `MissingKeyPolicy::Fail`), `NotAList`/`NotAMapping` when the row does not
    /// have the shape the key describes, and any denormalization error raised
    /// by a typed transformation.
    pub fn run_transformations(
        &self,
        result: &mut DecodedRow,
        transformers: &ResultTransformers,
    ) -> Result<(), DeserializingConnectionError> {
        if transformers.is_empty() {
            return Ok(());
        }
        debug!(transformers = transformers.len(), "running result transformers");

        for transformer in transformers {
            trace!(
                key = %transformer.key(),
                rename_to = ?transformer.rename_to(),
                "applying result transformer"
            );
            let snapshot = result.clone();
            self.run_recursive(transformer, &snapshot, result, 0)?;
        }
        Ok(())
    }

    /// Run all transformers on every row.
    ///
    /// # Errors
    /// See [`ResultTransformerRunner::run_transformations`].
    pub fn run_transformations_on_rows(
        &self,
        rows: &mut [DecodedRow],
        transformers: &ResultTransformers,
    ) -> Result<(), DeserializingConnectionError> {
        for row in rows {
            self.run_transformations(row, transformers)?;
        }
        Ok(())
    }

    /// Apply a single transformer to a standalone scalar.
    ///
    /// The function receives empty mappings for the current level and the row.
    ///
    /// # Errors
    /// Returns `SingleValueTransformationMustNotContainRenaming` when the
    /// transformer renames, and any error raised by the transformation.
    pub fn transform_single_value(
        &self,
        transformer: &ResultTransformer,
        value: Value,
    ) -> Result<Value, DeserializingConnectionError> {
        ensure_single_value_transformer(transformer)?;
        let Some(transformation) = transformer.transformation() else {
            return Ok(value);
        };
        let empty = DecodedRow::new();
        transformation.apply(&self.denormalizer, value, &empty, &empty)
    }

    fn run_recursive(
        &self,
        transformer: &ResultTransformer,
        result: &DecodedRow,
        result_of_level: &mut DecodedRow,
        level_index: usize,
    ) -> Result<(), DeserializingConnectionError> {
        let levels = transformer.key().segments();
        let level_key = levels[level_index].as_str();

        if level_index == levels.len() - 1 {
            return self.transform_result(transformer, level_key, result, result_of_level);
        }

        match result_of_level.get_mut(level_key) {
            Some(child) => self.descend(transformer, result, child, level_index + 1),
            None => self.key_not_found(transformer),
        }
    }

    /// `value` sits at `levels[..level_index]`; continue with `levels[level_index]`.
    fn descend(
        &self,
        transformer: &ResultTransformer,
        result: &DecodedRow,
        value: &mut Value,
        level_index: usize,
    ) -> Result<(), DeserializingConnectionError> {
        let levels = transformer.key().segments();

        if levels[level_index] == ARRAY_KEY_IDENTIFIER {
            return match value {
                Value::Null => Ok(()),
                Value::Array(items) => {
                    for item in items {
                        self.descend(transformer, result, item, level_index + 1)?;
                    }
                    Ok(())
                }
                _ => Err(DeserializingConnectionError::NotAList(
                    levels[..level_index].join("."),
                )),
            };
        }

        match value {
            Value::Null => Ok(()),
            Value::Object(map) => self.run_recursive(transformer, result, map, level_index),
            _ => Err(DeserializingConnectionError::NotAMapping(
                levels[..level_index].join("."),
            )),
        }
    }

    fn transform_result(
        &self,
        transformer: &ResultTransformer,
        level_key: &str,
        result: &DecodedRow,
        result_of_level: &mut DecodedRow,
    ) -> Result<(), DeserializingConnectionError> {
        let Some(payload) = result_of_level.get(level_key).cloned() else {
            return self.key_not_found(transformer);
        };

        if let Some(transformation) = transformer.transformation() {
            let transformed =
                transformation.apply(&self.denormalizer, payload, result_of_level, result)?;
            result_of_level.insert(level_key.to_string(), transformed);
        }

        if let Some(rename_to) = transformer.rename_to() {
            if let Some(value) = result_of_level.shift_remove(level_key) {
                result_of_level.insert(rename_to.to_string(), value);
            }
        }

        Ok(())
    }

    fn key_not_found(
        &self,
        transformer: &ResultTransformer,
    ) -> Result<(), DeserializingConnectionError> {
        match self.missing_key_policy {
            MissingKeyPolicy::Fail => Err(DeserializingConnectionError::TransformerKeyNotFound(
                transformer.key().to_string(),
            )),
            MissingKeyPolicy::Ignore => Ok(()),
        }
    }
}

pub(crate) fn ensure_single_value_transformer(
    transformer: &ResultTransformer,
) -> Result<(), DeserializingConnectionError> {
    if transformer.rename_to().is_some() {
        return Err(DeserializingConnectionError::SingleValueTransformationMustNotContainRenaming);
    }
    Ok(())
}
