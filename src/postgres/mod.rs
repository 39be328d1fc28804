// PostgreSQL backend for the query executor
//
// - config: connection options with required-field validation
// - params: parameter conversion between middleware and PostgreSQL types
// - query: result extraction and building
// - executor: `QueryExecutor` implementation for `tokio_postgres::Client`

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::PostgresOptions;
pub use params::Params;
pub use query::{build_result_set_from_rows, postgres_extract_value};
