use std::sync::Arc;

use super::DecodedRow;
use super::row::CustomDbRow;
use crate::types::RowValues;

/// Rows returned by one query.
///
/// Column names are known even when the query matched no rows, so "no rows"
/// and "a row full of nulls" stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub results: Vec<CustomDbRow>,
    column_names: Option<Arc<Vec<String>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
        }
    }

    /// Must be called before any row is added.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names.as_ref().map_or(0, |names| names.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Add a row to the result set. Rows added before column names are set are dropped.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results
                .push(CustomDbRow::new(Arc::clone(column_names), row_values));
        }
    }

    /// First column of the first row, `None` when the query returned no rows.
    #[must_use]
    pub fn first_value(&self) -> Option<&RowValues> {
        self.results.first().and_then(|row| row.get_by_index(0))
    }

    /// First column of every row.
    pub fn first_column(&self) -> impl Iterator<Item = &RowValues> {
        self.results.iter().filter_map(|row| row.get_by_index(0))
    }

    /// Consume into column-keyed rows with every value passed through as is.
    #[must_use]
    pub fn into_rows(self) -> Vec<DecodedRow> {
        self.results
            .into_iter()
            .map(|row| {
                row.into_columns()
                    .map(|(column, value)| (column, value.to_json()))
                    .collect()
            })
            .collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = CustomDbRow;
    type IntoIter = std::vec::IntoIter<CustomDbRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
