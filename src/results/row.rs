use std::sync::Arc;

use crate::types::RowValues;

/// One raw row. Column names are shared with every other row of the same result set.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDbRow {
    pub column_names: Arc<Vec<String>>,
    pub values: Vec<RowValues>,
}

impl CustomDbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Value of the first column called `column_name`.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_names
            .iter()
            .position(|col| col == column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Pair every value with its column name, consuming the row.
    ///
    /// A value without a matching name is keyed by its position.
    pub fn into_columns(self) -> impl Iterator<Item = (String, RowValues)> {
        let names = self.column_names;
        self.values
            .into_iter()
            .enumerate()
            .map(move |(idx, value)| {
                let name = names.get(idx).cloned().unwrap_or_else(|| idx.to_string());
                (name, value)
            })
    }
}
