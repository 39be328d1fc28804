use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::key::TransformerKey;
use crate::denormalizer::TypedDenormalizer;
use crate::error::DeserializingConnectionError;
use crate::results::DecodedRow;

type TransformResult = Result<Value, DeserializingConnectionError>;

type TransformFn =
    dyn Fn(&TypedDenormalizer, Value, &DecodedRow, &DecodedRow) -> TransformResult + Send + Sync;

/// The function part of a transformer.
///
/// Every user function receives `(payload, result_of_level, result)`: the
/// targeted value, the mapping that holds it, and the whole row. A `null`
/// payload is never denormalized; typed functions see it as `None` and are
/// still called. A non-`None` typed return value is normalized back into a
/// tree, a `None` return writes `null`.
#[derive(Clone)]
pub struct Transformation {
    denormalize_to: Option<&'static str>,
    normalize_result: bool,
    apply: Arc<TransformFn>,
}

impl Transformation {
    /// Works on the tree value directly and writes back whatever it returns.
    pub fn raw<F>(transformer: F) -> Self
    where
        F: Fn(Value, &DecodedRow, &DecodedRow) -> Value + Send + Sync + 'static,
    {
        Self {
            denormalize_to: None,
            normalize_result: false,
            apply: erase(move |_, payload, level, result| {
                Ok(transformer(payload, level, result))
            }),
        }
    }

    /// Works on the tree value and returns a typed value that is normalized back.
    pub fn normalized<R, F>(transformer: F) -> Self
    where
        R: Serialize + 'static,
        F: Fn(Value, &DecodedRow, &DecodedRow) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            denormalize_to: None,
            normalize_result: true,
            apply: erase(move |denormalizer, payload, level, result| {
                normalize_output(denormalizer, transformer(payload, level, result))
            }),
        }
    }

    /// Denormalizes the payload into `T` and normalizes the typed result back.
    pub fn denormalized<T, R, F>(transformer: F) -> Self
    where
        T: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(Option<T>, &DecodedRow, &DecodedRow) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            denormalize_to: Some(std::any::type_name::<T>()),
            normalize_result: true,
            apply: erase(move |denormalizer, payload, level, result| {
                let typed = denormalize_input::<T>(denormalizer, payload)?;
                normalize_output(denormalizer, transformer(typed, level, result))
            }),
        }
    }

    /// Denormalizes the payload into `T` and writes back the returned tree as is.
    pub fn denormalized_raw<T, F>(transformer: F) -> Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(Option<T>, &DecodedRow, &DecodedRow) -> Value + Send + Sync + 'static,
    {
        Self {
            denormalize_to: Some(std::any::type_name::<T>()),
            normalize_result: false,
            apply: erase(move |denormalizer, payload, level, result| {
                let typed = denormalize_input::<T>(denormalizer, payload)?;
                Ok(transformer(typed, level, result))
            }),
        }
    }

    /// Type name the payload is denormalized into, if any.
    #[must_use]
    pub fn denormalize_to(&self) -> Option<&'static str> {
        self.denormalize_to
    }

    #[must_use]
    pub fn is_result_normalized(&self) -> bool {
        self.normalize_result
    }

    pub(crate) fn apply(
        &self,
        denormalizer: &TypedDenormalizer,
        payload: Value,
        result_of_level: &DecodedRow,
        result: &DecodedRow,
    ) -> Result<Value, DeserializingConnectionError> {
        (self.apply)(denormalizer, payload, result_of_level, result)
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformation")
            .field("denormalize_to", &self.denormalize_to)
            .field("normalize_result", &self.normalize_result)
            .finish_non_exhaustive()
    }
}

fn erase<F>(apply: F) -> Arc<TransformFn>
where
    F: Fn(&TypedDenormalizer, Value, &DecodedRow, &DecodedRow) -> TransformResult
        + Send
        + Sync
        + 'static,
{
    Arc::new(apply)
}

fn denormalize_input<T: DeserializeOwned>(
    denormalizer: &TypedDenormalizer,
    payload: Value,
) -> Result<Option<T>, DeserializingConnectionError> {
    if payload.is_null() {
        return Ok(None);
    }
    denormalizer.denormalize(payload).map(Some)
}

fn normalize_output<R: Serialize>(
    denormalizer: &TypedDenormalizer,
    output: Option<R>,
) -> Result<Value, DeserializingConnectionError> {
    match output {
        Some(value) => denormalizer.normalize(&value),
        None => Ok(Value::Null),
    }
}

/// One path-addressed mutation of a decoded row: transform, rename, or both.
#[derive(Clone, Debug)]
pub struct ResultTransformer {
    key: TransformerKey,
    transformation: Option<Transformation>,
    rename_to: Option<String>,
}

impl ResultTransformer {
    /// # Errors
    /// Returns a configuration error for an invalid key.
    pub fn to_transform(
        key: &str,
        transformation: Transformation,
    ) -> Result<Self, DeserializingConnectionError> {
        Ok(Self {
            key: TransformerKey::new(key)?,
            transformation: Some(transformation),
            rename_to: None,
        })
    }

    /// # Errors
    /// Returns a configuration error for an invalid key or an empty rename target.
    pub fn to_rename(key: &str, rename_to: &str) -> Result<Self, DeserializingConnectionError> {
        Ok(Self {
            key: TransformerKey::new(key)?,
            transformation: None,
            rename_to: Some(validate_rename_target(rename_to)?),
        })
    }

    /// The rename happens after the transformation, so the new key holds the transformed value.
    ///
    /// # Errors
    /// Returns a configuration error for an invalid key or an empty rename target.
    pub fn to_transform_and_rename(
        key: &str,
        transformation: Transformation,
        rename_to: &str,
    ) -> Result<Self, DeserializingConnectionError> {
        Ok(Self {
            key: TransformerKey::new(key)?,
            transformation: Some(transformation),
            rename_to: Some(validate_rename_target(rename_to)?),
        })
    }

    #[must_use]
    pub fn key(&self) -> &TransformerKey {
        &self.key
    }

    #[must_use]
    pub fn rename_to(&self) -> Option<&str> {
        self.rename_to.as_deref()
    }

    #[must_use]
    pub fn transformation(&self) -> Option<&Transformation> {
        self.transformation.as_ref()
    }

    #[must_use]
    pub fn has_transformation(&self) -> bool {
        self.transformation.is_some()
    }

    #[must_use]
    pub fn denormalize_to(&self) -> Option<&'static str> {
        self.transformation.as_ref().and_then(Transformation::denormalize_to)
    }

    #[must_use]
    pub fn is_transformed_result_normalized(&self) -> bool {
        self.transformation
            .as_ref()
            .is_some_and(Transformation::is_result_normalized)
    }
}

fn validate_rename_target(rename_to: &str) -> Result<String, DeserializingConnectionError> {
    if rename_to.is_empty() {
        return Err(DeserializingConnectionError::KeyContainsEmptySegment(
            rename_to.to_string(),
        ));
    }
    Ok(rename_to.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn named_constructors_populate_fields() {
        let transform = ResultTransformer::to_transform(
            "name",
            Transformation::raw(|payload, _, _| payload),
        )
        .unwrap();
        assert!(transform.has_transformation());
        assert_eq!(transform.rename_to(), None);
        assert!(!transform.is_transformed_result_normalized());

        let rename = ResultTransformer::to_rename("projects.*.accessToken", "token").unwrap();
        assert!(!rename.has_transformation());
        assert_eq!(rename.rename_to(), Some("token"));
        assert_eq!(rename.key().as_str(), "projects.*.accessToken");

        let both = ResultTransformer::to_transform_and_rename(
            "limit",
            Transformation::denormalized::<u32, u32, _>(|limit, _, _| limit.map(|l| l + 1)),
            "maxResults",
        )
        .unwrap();
        assert_eq!(both.denormalize_to(), Some("u32"));
        assert!(both.is_transformed_result_normalized());
    }

    #[test]
    fn invalid_key_fails_construction() {
        assert!(ResultTransformer::to_rename("*.name", "title").is_err());
        assert!(ResultTransformer::to_rename("name", "").is_err());
    }

    #[test]
    fn typed_transformation_skips_denormalization_for_null() {
        let transformation = Transformation::denormalized::<u32, String, _>(|value, _, _| {
            Some(value.map_or_else(|| "none".to_string(), |v| v.to_string()))
        });
        let empty = DecodedRow::new();

        let out = transformation
            .apply(&TypedDenormalizer, Value::Null, &empty, &empty)
            .unwrap();
        assert_eq!(out, json!("none"));

        let out = transformation
            .apply(&TypedDenormalizer, json!(7), &empty, &empty)
            .unwrap();
        assert_eq!(out, json!("7"));
    }

    #[test]
    fn typed_transformation_surfaces_denormalization_errors() {
        let transformation = Transformation::denormalized::<u32, u32, _>(|value, _, _| value);
        let empty = DecodedRow::new();
        let err = transformation
            .apply(&TypedDenormalizer, json!("not a number"), &empty, &empty)
            .unwrap_err();
        assert!(err.is_data_error());
    }
}
