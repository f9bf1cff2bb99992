//! Postal code to city record lookup.

use std::collections::HashMap;

use frman_ingest::{column_strings, has_column};
use frman_model::PostalResolution;
use polars::prelude::DataFrame;

use crate::error::{Result, missing_column};

/// Postal code → reference record identifier, built once per run.
#[derive(Debug, Clone, Default)]
pub struct PostalLookup {
    by_code: HashMap<String, String>,
}

impl PostalLookup {
    /// Invert a reference table of (identifier, postal code) rows. Codes are
    /// trimmed, blank codes skipped, and the first identifier seen for a
    /// code wins.
    pub fn from_frame(df: &DataFrame, id_column: &str, postal_column: &str) -> Result<Self> {
        for column in [id_column, postal_column] {
            if !has_column(df, column) {
                return Err(missing_column(column));
            }
        }
        let ids = column_strings(df, id_column)?;
        let codes = column_strings(df, postal_column)?;
        Ok(Self::from_pairs(ids.into_iter().zip(codes)))
    }

    /// Build from (identifier, postal code) pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut by_code = HashMap::new();
        for (id, code) in pairs {
            let code = code.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            by_code
                .entry(code.to_string())
                .or_insert_with(|| id.into());
        }
        Self { by_code }
    }

    /// Exact match on the trimmed input. There is no fallback record.
    pub fn resolve(&self, raw: &str) -> PostalResolution {
        match self.by_code.get(raw.trim()) {
            Some(id) => PostalResolution::Resolved(id.clone()),
            None => PostalResolution::Unresolved,
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
