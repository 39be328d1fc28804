//! Decoding of raw column values into tree values.
//!
//! Every function here is pure: the same input, decoder type and policy always
//! produce the same output.

use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::error::DeserializingConnectionError;
use crate::results::{CustomDbRow, DecodedRow};
use crate::types::{DecodePolicy, DecoderType, RowValues};

/// Decoder types by column name. Columns not listed pass through unchanged.
pub type DecoderTypes = HashMap<String, DecoderType>;

const TRUTHY: [&str; 4] = ["1", "true", "on", "yes"];
const FALSY: [&str; 5] = ["0", "false", "off", "no", ""];

/// Decode a single raw value.
///
/// # Errors
/// Returns `InvalidJson` for malformed JSON and `NotDecodable` when the strict
/// policy rejects a scalar, a non-nullable JSON decoder receives `null`, or a
/// float is not finite.
pub fn decode_value(
    value: &RowValues,
    decoder: DecoderType,
    policy: DecodePolicy,
) -> Result<Value, DeserializingConnectionError> {
    if value.is_null() {
        if decoder.is_nullable() {
            return Ok(Value::Null);
        }
        if decoder == DecoderType::JsonEmptyArrayOnNull {
            return Ok(Value::Array(Vec::new()));
        }
    }

    match decoder {
        DecoderType::Int | DecoderType::NullableInt => decode_int(value, decoder, policy),
        DecoderType::Float | DecoderType::NullableFloat => decode_float(value, decoder, policy),
        DecoderType::Bool | DecoderType::NullableBool => decode_bool(value, decoder, policy),
        DecoderType::Json | DecoderType::NullableJson | DecoderType::JsonEmptyArrayOnNull => {
            decode_json(value, decoder)
        }
    }
}

/// Decode every listed column of a row, in place of the raw values.
///
/// A decoder listed for a column the row does not have is skipped.
///
/// # Errors
/// Propagates the first decoding error.
pub fn decode_row(
    row: CustomDbRow,
    decoder_types: &DecoderTypes,
    policy: DecodePolicy,
) -> Result<DecodedRow, DeserializingConnectionError> {
    let mut decoded = DecodedRow::new();
    for (column, value) in row.into_columns() {
        let tree = match decoder_types.get(&column) {
            Some(decoder) => decode_value(&value, *decoder, policy)?,
            None => value.to_json(),
        };
        decoded.insert(column, tree);
    }
    Ok(decoded)
}

/// Decode every row of a result set.
///
/// # Errors
/// Propagates the first decoding error.
pub fn decode_rows<I>(
    rows: I,
    decoder_types: &DecoderTypes,
    policy: DecodePolicy,
) -> Result<Vec<DecodedRow>, DeserializingConnectionError>
where
    I: IntoIterator<Item = CustomDbRow>,
{
    rows.into_iter()
        .map(|row| decode_row(row, decoder_types, policy))
        .collect()
}

fn not_decodable(value: &RowValues, decoder: DecoderType) -> DeserializingConnectionError {
    DeserializingConnectionError::NotDecodable {
        decoder,
        value: value.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn decode_int(
    value: &RowValues,
    decoder: DecoderType,
    policy: DecodePolicy,
) -> Result<Value, DeserializingConnectionError> {
    let parsed = match value {
        RowValues::Int(i) => Some(*i),
        RowValues::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => Some(i),
                Err(_) if policy == DecodePolicy::Permissive => trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64),
                Err(_) => None,
            }
        }
        RowValues::Float(f) if f.is_finite() => {
            if policy == DecodePolicy::Permissive || f.fract() == 0.0 {
                Some(*f as i64)
            } else {
                None
            }
        }
        RowValues::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    match (parsed, policy) {
        (Some(i), _) => Ok(Value::from(i)),
        (None, DecodePolicy::Permissive) => Ok(Value::from(0_i64)),
        (None, DecodePolicy::Strict) => Err(not_decodable(value, decoder)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn decode_float(
    value: &RowValues,
    decoder: DecoderType,
    policy: DecodePolicy,
) -> Result<Value, DeserializingConnectionError> {
    let parsed = match value {
        RowValues::Float(f) => Some(*f),
        RowValues::Int(i) => Some(*i as f64),
        RowValues::Text(s) => s.trim().parse::<f64>().ok(),
        RowValues::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    let parsed = match (parsed, policy) {
        (Some(f), _) => f,
        (None, DecodePolicy::Permissive) => 0.0,
        (None, DecodePolicy::Strict) => return Err(not_decodable(value, decoder)),
    };

    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| not_decodable(value, decoder))
}

fn decode_bool(
    value: &RowValues,
    decoder: DecoderType,
    policy: DecodePolicy,
) -> Result<Value, DeserializingConnectionError> {
    let parsed = match value {
        RowValues::Bool(b) => Some(*b),
        RowValues::Int(i) => match policy {
            DecodePolicy::Permissive => Some(*i != 0),
            DecodePolicy::Strict => value.as_bool().copied(),
        },
        RowValues::Float(f) if policy == DecodePolicy::Permissive => Some(*f != 0.0),
        RowValues::Text(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSY.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };

    match (parsed, policy) {
        (Some(b), _) => Ok(Value::Bool(b)),
        (None, DecodePolicy::Permissive) => Ok(Value::Bool(false)),
        (None, DecodePolicy::Strict) => Err(not_decodable(value, decoder)),
    }
}

fn decode_json(
    value: &RowValues,
    decoder: DecoderType,
) -> Result<Value, DeserializingConnectionError> {
    match value {
        RowValues::Text(s) => parse_json(s),
        RowValues::JSON(tree) => Ok(tree.clone()),
        RowValues::Blob(bytes) => serde_json::from_slice(bytes).map_err(|source| {
            DeserializingConnectionError::InvalidJson {
                value: String::from_utf8_lossy(bytes).into_owned(),
                source,
            }
        }),
        RowValues::Int(_) | RowValues::Bool(_) => Ok(value.to_json()),
        RowValues::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| not_decodable(value, decoder)),
        RowValues::Timestamp(_) | RowValues::Null => Err(not_decodable(value, decoder)),
    }
}

fn parse_json(text: &str) -> Result<Value, DeserializingConnectionError> {
    serde_json::from_str(text).map_err(|source| DeserializingConnectionError::InvalidJson {
        value: text.to_string(),
        source,
    })
}
