//! Raw intake-form rows.
//!
//! An [`IntakeRow`] holds one respondent's answers keyed by source column
//! name. Column names differ between the spreadsheet export, the SQLite
//! snapshot and test fixtures, so typed access goes through
//! [`IntakeColumns`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source column names for each intake field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeColumns {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub postal_code: String,
    pub needs: String,
    pub details: String,
    pub contact_preference: String,
    pub mobility: String,
    /// Column holding the language tag added by the language splitter.
    pub language: String,
}

impl Default for IntakeColumns {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            phone: "phone".to_string(),
            email: "email".to_string(),
            postal_code: "zip".to_string(),
            needs: "needs".to_string(),
            details: "details".to_string(),
            contact_preference: "contact_preference".to_string(),
            mobility: "mobility".to_string(),
            language: "language".to_string(),
        }
    }
}

/// One raw survey response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRow {
    values: BTreeMap<String, String>,
}

impl IntakeRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling rows from a table.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Raw cell text; missing columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// Trimmed cell text, `None` when missing or blank.
    pub fn value(&self, column: &str) -> Option<&str> {
        let trimmed = self.get(column).trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed view over this row using the given column names.
    pub fn fields<'a>(&'a self, columns: &IntakeColumns) -> IntakeFields<'a> {
        IntakeFields {
            name: self.get(&columns.name).trim(),
            phone: self.get(&columns.phone).trim(),
            email: self.get(&columns.email).trim(),
            postal_code: self.get(&columns.postal_code).trim(),
            needs: self.get(&columns.needs),
            details: self.get(&columns.details).trim(),
            contact_preference: self.get(&columns.contact_preference).trim(),
            mobility: self.get(&columns.mobility).trim(),
            language: self.get(&columns.language).trim(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for IntakeRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Borrowed, typed view of an [`IntakeRow`].
///
/// `needs` is left untrimmed: the normalizer preserves the remainder verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeFields<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub postal_code: &'a str,
    pub needs: &'a str,
    pub details: &'a str,
    pub contact_preference: &'a str,
    pub mobility: &'a str,
    pub language: &'a str,
}
