use thiserror::Error;

use crate::types::DecoderType;

#[derive(Debug, Error)]
pub enum DeserializingConnectionError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    // -- Configuration, detected before any query runs
    #[error("Result transformer key \"{0}\" can not start with an array identifier")]
    KeyStartsWithArrayIdentifier(String),

    #[error("Result transformer key \"{0}\" can not end with an array identifier")]
    KeyEndsWithArrayIdentifier(String),

    #[error("Result transformer key \"{0}\" contains an empty segment")]
    KeyContainsEmptySegment(String),

    #[error("Conflict between result transformer keys and renameTo configuration: \"{0}\"")]
    ConflictBetweenKeysAndRenameTo(String),

    #[error("A transformer for a single value must not contain a renameTo configuration")]
    SingleValueTransformationMustNotContainRenaming,

    // -- Not found
    #[error("The item could not be found")]
    ElementNotFound,

    #[error("The key \"{0}\", for the result transformer was not found")]
    TransformerKeyNotFound(String),

    #[error("The index column \"{0}\" was not found in the result row")]
    IndexColumnNotFound(String),

    // -- Type mismatch
    #[error("The query did not return exactly one result")]
    QueryDidNotReturnExactlyOneResult,

    #[error("The query did not return an int")]
    QueryDidNotReturnAnInt,

    #[error("The query did not return a boolean")]
    QueryDidNotReturnABoolean,

    #[error("The index returned from the index function must be a string, got {0}")]
    IndexMustBeString(String),

    #[error("Expected a list at result transformer key segment \"{0}\"")]
    NotAList(String),

    #[error("Expected a mapping at result transformer key segment \"{0}\"")]
    NotAMapping(String),

    // -- Data
    #[error("Invalid JSON value {value}: {source}")]
    InvalidJson {
        value: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Value {value} can not be decoded as {decoder:?}")]
    NotDecodable { decoder: DecoderType, value: String },

    #[error("Denormalization into {target} failed: {source}")]
    Denormalization {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Normalization failed: {0}")]
    Normalization(#[source] serde_json::Error),

    // -- Backend
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl DeserializingConnectionError {
    /// Errors raised while building transformers or before a query is executed.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::KeyStartsWithArrayIdentifier(_)
                | Self::KeyEndsWithArrayIdentifier(_)
                | Self::KeyContainsEmptySegment(_)
                | Self::ConflictBetweenKeysAndRenameTo(_)
                | Self::SingleValueTransformationMustNotContainRenaming
                | Self::ConfigError(_)
        )
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound | Self::TransformerKeyNotFound(_) | Self::IndexColumnNotFound(_)
        )
    }

    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::QueryDidNotReturnExactlyOneResult
                | Self::QueryDidNotReturnAnInt
                | Self::QueryDidNotReturnABoolean
                | Self::IndexMustBeString(_)
                | Self::NotAList(_)
                | Self::NotAMapping(_)
        )
    }

    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson { .. }
                | Self::NotDecodable { .. }
                | Self::Denormalization { .. }
                | Self::Normalization(_)
        )
    }
}
