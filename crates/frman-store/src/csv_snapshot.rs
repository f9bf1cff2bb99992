use std::path::PathBuf;

use frman_ingest::read_csv_table;
use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;

use crate::error::{Result, StoreError};
use crate::store::{RecordStore, TableSelector};

/// Read-only source over a CSV export of the intake sheet.
#[derive(Debug, Clone)]
pub struct CsvSnapshot {
    path: PathBuf,
}

impl CsvSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_only(&self) -> StoreError {
        StoreError::Rejected {
            message: format!("CSV snapshot {} is read-only", self.path.display()),
        }
    }
}

impl RecordStore for CsvSnapshot {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn read_table(&self, _selector: &TableSelector) -> Result<DataFrame> {
        Ok(read_csv_table(&self.path)?)
    }

    fn write_row(&mut self, _fields: &Fields) -> Result<RecordId> {
        Err(self.read_only())
    }

    fn update_row(&mut self, _id: &RecordId, _fields: &Fields) -> Result<()> {
        Err(self.read_only())
    }

    fn delete_row(&mut self, _id: &RecordId) -> Result<()> {
        Err(self.read_only())
    }
}
