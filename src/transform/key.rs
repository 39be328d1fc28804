use std::fmt;

use crate::error::DeserializingConnectionError;

/// Segment that targets every element of the list at its position.
pub const ARRAY_KEY_IDENTIFIER: &str = "*";
pub const KEY_SEPARATOR: char = '.';

/// Dotted path to the value a transformer works on.
///
/// `"user.projects.*.name"` walks into `user`, then `projects`, then every
/// element of that list, and targets `name` in each element. The key is the
/// same for single-row and multi-row queries: it always starts at the row, so
/// a leading `*` is never needed and is rejected, as is a trailing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformerKey {
    value: String,
    segments: Vec<String>,
}

impl TransformerKey {
    /// # Errors
    /// Returns a configuration error when the key starts or ends with the
    /// array identifier, or contains an empty segment.
    pub fn new(value: impl Into<String>) -> Result<Self, DeserializingConnectionError> {
        let value = value.into();
        let segments: Vec<String> = value.split(KEY_SEPARATOR).map(str::to_string).collect();

        if segments.first().is_some_and(|s| s == ARRAY_KEY_IDENTIFIER) {
            return Err(DeserializingConnectionError::KeyStartsWithArrayIdentifier(value));
        }
        if segments.last().is_some_and(|s| s == ARRAY_KEY_IDENTIFIER) {
            return Err(DeserializingConnectionError::KeyEndsWithArrayIdentifier(value));
        }
        if segments.iter().any(String::is_empty) {
            return Err(DeserializingConnectionError::KeyContainsEmptySegment(value));
        }

        Ok(Self { value, segments })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The key the transformation reads and writes at the deepest level.
    #[must_use]
    pub fn last_segment(&self) -> &str {
        // Construction guarantees at least one non-empty segment.
        self.segments.last().map_or("", String::as_str)
    }
}

impl fmt::Display for TransformerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<&str> for TransformerKey {
    type Error = DeserializingConnectionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_wildcard_is_accepted() {
        let key = TransformerKey::new("a.*.b").unwrap();
        assert_eq!(key.segments(), ["a", "*", "b"]);
        assert_eq!(key.last_segment(), "b");
        assert_eq!(key.to_string(), "a.*.b");
    }

    #[test]
    fn single_segment_key() {
        let key = TransformerKey::new("name").unwrap();
        assert_eq!(key.segments(), ["name"]);
        assert_eq!(key.last_segment(), "name");
    }

    #[test]
    fn leading_wildcard_is_rejected() {
        let err = TransformerKey::new("*.a").unwrap_err();
        assert!(matches!(
            err,
            DeserializingConnectionError::KeyStartsWithArrayIdentifier(ref k) if k == "*.a"
        ));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn trailing_wildcard_is_rejected() {
        let err = TransformerKey::new("a.*").unwrap_err();
        assert!(matches!(
            err,
            DeserializingConnectionError::KeyEndsWithArrayIdentifier(ref k) if k == "a.*"
        ));
    }

    #[test]
    fn lone_wildcard_is_rejected() {
        assert!(matches!(
            TransformerKey::new("*"),
            Err(DeserializingConnectionError::KeyStartsWithArrayIdentifier(_))
        ));
    }

    #[test]
    fn empty_segments_are_rejected() {
        for key in ["", "a..b", ".a", "a."] {
            assert!(
                matches!(
                    TransformerKey::new(key),
                    Err(DeserializingConnectionError::KeyContainsEmptySegment(_))
                ),
                "{key}"
            );
        }
    }
}
