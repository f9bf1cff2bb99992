//! Record store adapters.
//!
//! Each adapter is bound to one table and implements [`RecordStore`]:
//! read a table as a text frame, insert, update and delete single records.
//! All I/O is blocking and sequential.
//!
//! - [`SqlStore`]: local SQLite snapshot database
//! - [`AirtableStore`]: hosted table, the usual destination
//! - [`SheetsStore`]: the intake spreadsheet
//! - [`MemoryStore`]: dry runs and tests
//! - [`CsvSnapshot`]: read-only CSV export of the intake sheet

mod airtable;
mod csv_snapshot;
mod error;
mod http;
mod memory;
mod record;
mod sheets;
mod sql;
mod store;
mod value;

pub use airtable::{AirtableConfig, AirtableStore};
pub use csv_snapshot::CsvSnapshot;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use record::{CREATED_TIME_COLUMN, ID_COLUMN, StoredRecord, records_to_frame};
pub use sheets::{
    SheetsConfig, SheetsStore, align_row, frame_to_grid, merge_row, quote_sheet, values_to_frame,
};
pub use sql::{IfExists, ROWID_COLUMN, SqlStore};
pub use store::{RecordStore, TableSelector};
pub use value::cell_text;
