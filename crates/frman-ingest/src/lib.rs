//! Intake table loading.
//!
//! Record stores and CSV exports all end up as Polars frames of text
//! columns; this crate owns that representation and the conversion to
//! [`frman_model::IntakeRow`].

mod csv_table;
mod error;
mod frame;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_table::read_csv_table;

// === Frame Conversion ===
pub use frame::{
    frame_from_maps, frame_from_records, frame_from_rows, records_from_frame, rows_from_frame,
};

// === Cell Access ===
pub use values::{
    any_to_string, column_names, column_strings, column_value_string, has_column, is_truthy,
};
