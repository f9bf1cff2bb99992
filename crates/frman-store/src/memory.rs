//! In-process record store for dry runs and tests.

use chrono::{SecondsFormat, Utc};
use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::record::{StoredRecord, records_to_frame};
use crate::store::{RecordStore, TableSelector};

/// Keeps records in memory and behaves like a hosted table: identifiers
/// are assigned on insert and reads include `id` and `createdTime`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: String,
    records: Vec<StoredRecord>,
    next_id: usize,
    /// Writes carrying this field are refused.
    reject_field: Option<String>,
    write_attempts: usize,
}

impl MemoryStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Seed an existing record with a fixed creation time.
    #[must_use]
    pub fn with_record(mut self, fields: Fields, created_time: impl Into<String>) -> Self {
        let id = self.allocate_id();
        self.records.push(StoredRecord {
            id,
            created_time: created_time.into(),
            fields,
        });
        self
    }

    /// Refuse any write that includes `field`, the way a hosted table
    /// rejects a value it cannot coerce.
    #[must_use]
    pub fn rejecting_field(mut self, field: impl Into<String>) -> Self {
        self.reject_field = Some(field.into());
        self
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&StoredRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Every `write_row` call, accepted or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        format!("mem{:05}", self.next_id)
    }

    fn check(&self, fields: &Fields) -> Result<()> {
        match &self.reject_field {
            Some(field) if fields.contains_key(field) => Err(StoreError::Rejected {
                message: format!("field '{field}' cannot accept the provided value"),
            }),
            _ => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| StoreError::UnknownRecord {
                id: id.to_string(),
                table: self.table.clone(),
            })
    }
}

impl RecordStore for MemoryStore {
    fn describe(&self) -> String {
        format!("memory:{}", self.table)
    }

    fn read_table(&self, _selector: &TableSelector) -> Result<DataFrame> {
        records_to_frame(&self.records)
    }

    fn write_row(&mut self, fields: &Fields) -> Result<RecordId> {
        self.write_attempts += 1;
        self.check(fields)?;
        let id = self.allocate_id();
        debug!(record = %id, fields = fields.len(), "memory insert");
        self.records.push(StoredRecord {
            id: id.clone(),
            created_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            fields: fields.clone(),
        });
        Ok(id)
    }

    fn update_row(&mut self, id: &RecordId, fields: &Fields) -> Result<()> {
        self.check(fields)?;
        let idx = self.position(id)?;
        for (name, value) in fields {
            self.records[idx].fields.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    fn delete_row(&mut self, id: &RecordId) -> Result<()> {
        let idx = self.position(id)?;
        self.records.remove(idx);
        Ok(())
    }
}
