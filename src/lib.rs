//! Typed result transformation on top of a raw query executor.
//!
//! Rows come back from the database as column name to raw value. This crate
//! decodes declared columns (ints, floats, bools, JSON), applies
//! path-addressed [`ResultTransformer`]s to the decoded tree and finally
//! denormalizes the tree into your `serde` types.

pub mod prelude;

pub mod config;
pub mod connection;
pub mod decoder;
pub mod decoding;
pub mod denormalizer;
pub mod error;
pub mod executor;
pub mod query_builder;
pub mod results;
pub mod transform;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{DeserializingOptions, DeserializingOptionsBuilder};
pub use connection::DeserializingConnection;
pub use decoder::{DecoderTypes, decode_row, decode_rows, decode_value};
pub use decoding::DecodingConnection;
pub use denormalizer::TypedDenormalizer;
pub use error::DeserializingConnectionError;
pub use executor::QueryExecutor;
pub use query_builder::{DenormalizedRows, DeserializingQuery};
pub use results::{CustomDbRow, DecodedRow, ResultSet};
pub use transform::{
    ResultTransformer, ResultTransformerRunner, ResultTransformers, Transformation,
    TransformerKey,
};
pub use types::{DecodePolicy, DecoderType, MissingKeyPolicy, RowValues};

#[cfg(feature = "postgres")]
pub use postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteExecutor, SqliteOptions, SqliteOptionsBuilder};
