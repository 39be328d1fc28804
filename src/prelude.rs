//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{DeserializingOptions, DeserializingOptionsBuilder};
pub use crate::connection::DeserializingConnection;
pub use crate::decoder::DecoderTypes;
pub use crate::decoding::DecodingConnection;
pub use crate::error::DeserializingConnectionError;
pub use crate::executor::QueryExecutor;
pub use crate::query_builder::DenormalizedRows;
pub use crate::results::{DecodedRow, ResultSet};
pub use crate::transform::{ResultTransformer, ResultTransformers, Transformation};
pub use crate::types::{DecodePolicy, DecoderType, MissingKeyPolicy, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresOptions;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteExecutor, SqliteOptions, SqliteOptionsBuilder};
