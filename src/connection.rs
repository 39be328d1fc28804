use crate::config::DeserializingOptions;
use crate::decoding::DecodingConnection;
use crate::denormalizer::TypedDenormalizer;
use crate::error::DeserializingConnectionError;
use crate::executor::QueryExecutor;
use crate::query_builder::DeserializingQuery;
use crate::transform::ResultTransformerRunner;

/// Runs queries, transforms the decoded rows and denormalizes them into typed values.
///
/// ```rust,no_run
/// # use deserializing_connection::prelude::*;
/// # use serde::Deserialize;
/// #[derive(Deserialize)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// # async fn demo() -> Result<(), DeserializingConnectionError> {
/// let executor = SqliteExecutor::builder(":memory:".to_string()).build().await?;
/// let conn = DeserializingConnection::new(executor, DeserializingOptions::default());
/// let user: Option<User> = conn
///     .query("SELECT id, name FROM users WHERE id = ?1")
///     .params(&[RowValues::Int(1)])
///     .find_one()
///     .await?;
/// # let _ = user;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeserializingConnection<E> {
    decoding: DecodingConnection<E>,
    runner: ResultTransformerRunner,
    denormalizer: TypedDenormalizer,
}

impl<E: QueryExecutor> DeserializingConnection<E> {
    #[must_use]
    pub fn new(executor: E, options: DeserializingOptions) -> Self {
        let denormalizer = TypedDenormalizer::new();
        Self {
            decoding: DecodingConnection::with_policy(executor, options.decode_policy),
            runner: ResultTransformerRunner::new(denormalizer, options.missing_key_policy),
            denormalizer,
        }
    }

    /// Start a query. Nothing runs until a terminal operation is awaited.
    #[must_use]
    pub fn query<'conn, 'q>(&'conn self, sql: &'q str) -> DeserializingQuery<'conn, 'q, E> {
        DeserializingQuery::new(self, sql)
    }

    /// The decoding layer, for untyped row access.
    #[must_use]
    pub fn decoding(&self) -> &DecodingConnection<E> {
        &self.decoding
    }

    #[must_use]
    pub fn runner(&self) -> &ResultTransformerRunner {
        &self.runner
    }

    #[must_use]
    pub fn denormalizer(&self) -> &TypedDenormalizer {
        &self.denormalizer
    }

    /// # Errors
    /// Returns executor errors.
    pub async fn execute_batch(&self, query: &str) -> Result<(), DeserializingConnectionError> {
        self.decoding.execute_batch(query).await
    }
}
