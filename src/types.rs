use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Raw values as they come back from the query executor, and as query parameters.
///
/// ```rust
/// use deserializing_connection::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("417df760-0d16-408f-8201-ec7760dee9fb".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value, already parsed by the driver
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Native booleans, plus the `0`/`1` integers `SQLite` stores them as.
    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    /// Passthrough tree form of a column nobody asked to decode.
    ///
    /// Timestamps become `"%F %T%.f"` strings and blobs become byte lists. A
    /// non-finite float has no JSON form and becomes `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(JsonValue::Null, JsonValue::Number),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(value) => value.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
        }
    }
}

impl std::fmt::Display for RowValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowValues::Int(i) => write!(f, "{i}"),
            RowValues::Float(v) => write!(f, "{v}"),
            RowValues::Text(s) => write!(f, "\"{s}\""),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Timestamp(dt) => write!(f, "{}", dt.format("%F %T%.f")),
            RowValues::Null => write!(f, "null"),
            RowValues::JSON(value) => write!(f, "{value}"),
            RowValues::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// How a raw column value is turned into a tree value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderType {
    Int,
    NullableInt,
    Float,
    NullableFloat,
    Bool,
    NullableBool,
    Json,
    NullableJson,
    /// `null` becomes an empty list, everything else is parsed as JSON.
    JsonEmptyArrayOnNull,
}

impl DecoderType {
    /// Whether a `null` input passes through as `null`.
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            Self::NullableInt | Self::NullableFloat | Self::NullableBool | Self::NullableJson
        )
    }
}

/// What the scalar decoders do with input they can not parse.
///
/// `Permissive` coerces: unparseable numbers become `0`/`0.0` and anything
/// that is not a recognised truthy value becomes `false`. `Strict` fails with
/// [`NotDecodable`](crate::DeserializingConnectionError::NotDecodable) instead.
///
/// Some input fails under both policies. JSON decoding is always strict, and a
/// float that parses to a non-finite value (`NaN`, `inf`) has no JSON number
/// form, so it is `NotDecodable` even when permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    #[default]
    Permissive,
    Strict,
}

/// What the transformer runner does when a key is absent from the decoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Fail with
    /// [`TransformerKeyNotFound`](crate::DeserializingConnectionError::TransformerKeyNotFound).
    #[default]
    Fail,
    /// Leave the row untouched for that branch.
    Ignore,
}
