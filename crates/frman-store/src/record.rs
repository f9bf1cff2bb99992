//! Hosted-table records as returned by the Airtable API.

use std::collections::BTreeMap;

use frman_ingest::{frame_from_maps, frame_from_records};
use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::cell_text;

/// Column holding the record identifier in flattened frames.
pub const ID_COLUMN: &str = "id";

/// Column holding the record creation timestamp in flattened frames.
pub const CREATED_TIME_COLUMN: &str = "createdTime";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(rename = "createdTime", default)]
    pub created_time: String,
    #[serde(default)]
    pub fields: Fields,
}

/// Flatten records into a frame: one column per field plus `id` and
/// `createdTime`. Fields missing from a record read as empty text.
pub fn records_to_frame(records: &[StoredRecord]) -> Result<DataFrame> {
    let rows: Vec<BTreeMap<String, String>> = records
        .iter()
        .map(|record| {
            let mut row: BTreeMap<String, String> = record
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), cell_text(value)))
                .collect();
            row.insert(ID_COLUMN.to_string(), record.id.clone());
            row.insert(CREATED_TIME_COLUMN.to_string(), record.created_time.clone());
            row
        })
        .collect();
    if rows.is_empty() {
        let header = [CREATED_TIME_COLUMN.to_string(), ID_COLUMN.to_string()];
        return Ok(frame_from_records(&header, &[])?);
    }
    Ok(frame_from_maps(&rows)?)
}
