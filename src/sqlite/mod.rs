// SQLite backend for the query executor
//
// - config: opening a connection from `SqliteOptions`
// - params: parameter conversion between middleware and SQLite types
// - query: result extraction and building
// - executor: `QueryExecutor` implementation on tokio's blocking pool

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use executor::{SharedSqliteConnection, SqliteExecutor};
pub use params::Params;
pub use query::build_result_set;
