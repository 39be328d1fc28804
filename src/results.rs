mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::CustomDbRow;

/// A row after decoding: column name to tree value, in column order.
pub type DecodedRow = serde_json::Map<String, serde_json::Value>;
