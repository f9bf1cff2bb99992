use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;

/// Which rows to read. The default reads the store's own table unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelector {
    /// Overrides the bound table (or, for SQLite, a full `SELECT`).
    pub table: Option<String>,
    /// Store-native filter: a `WHERE` clause for SQLite, a formula for
    /// Airtable. Ignored by stores without filtering.
    pub filter: Option<String>,
}

impl TableSelector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: Some(name.into()),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub(crate) fn table_or<'a>(&'a self, bound: &'a str) -> &'a str {
        self.table.as_deref().unwrap_or(bound)
    }
}

/// A table-shaped record store bound to one table.
///
/// Reads return frames of text columns. Writes take a JSON field map and
/// return the identifier the store assigned.
pub trait RecordStore {
    /// Short description for logs, e.g. `airtable:Requests`.
    fn describe(&self) -> String;

    fn read_table(&self, selector: &TableSelector) -> crate::Result<DataFrame>;

    fn write_row(&mut self, fields: &Fields) -> crate::Result<RecordId>;

    fn update_row(&mut self, id: &RecordId, fields: &Fields) -> crate::Result<()>;

    fn delete_row(&mut self, id: &RecordId) -> crate::Result<()>;
}
