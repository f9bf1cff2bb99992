//! Conversion between text tables and Polars frames.
//!
//! Every store hands back rows of text keyed by column name. Frames built
//! here keep every column as `String` so postal codes such as `01234` keep
//! their leading zeros.

use std::collections::BTreeMap;

use frman_model::IntakeRow;
use polars::prelude::*;

use crate::error::Result;
use crate::values::{column_names, column_value_string};

/// Build a frame from a header and positional rows. Short rows are padded
/// with empty text; extra cells are dropped.
pub fn frame_from_records(header: &[String], rows: &[Vec<String>]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(header.len());
    for (idx, name) in header.iter().enumerate() {
        let values: Vec<String> = rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }
    Ok(DataFrame::new(columns)?)
}

/// Build a frame from keyed rows. Columns appear in first-seen order and
/// keys missing from a row read as empty text.
pub fn frame_from_maps(rows: &[BTreeMap<String, String>]) -> Result<DataFrame> {
    let mut header: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }
    let positional: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            header
                .iter()
                .map(|name| row.get(name).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    frame_from_records(&header, &positional)
}

/// Frame holding the given intake rows.
pub fn frame_from_rows(rows: &[IntakeRow]) -> Result<DataFrame> {
    let maps: Vec<BTreeMap<String, String>> = rows
        .iter()
        .map(|row| {
            row.columns()
                .map(|name| (name.to_string(), row.get(name).to_string()))
                .collect()
        })
        .collect();
    frame_from_maps(&maps)
}

/// One [`IntakeRow`] per frame row.
pub fn rows_from_frame(df: &DataFrame) -> Vec<IntakeRow> {
    let names = column_names(df);
    (0..df.height())
        .map(|idx| {
            names
                .iter()
                .map(|name| (name.clone(), column_value_string(df, name, idx)))
                .collect()
        })
        .collect()
}

/// Header plus positional text rows, the shape the spreadsheet and CSV
/// writers expect.
pub fn records_from_frame(df: &DataFrame) -> (Vec<String>, Vec<Vec<String>>) {
    let names = column_names(df);
    let rows = (0..df.height())
        .map(|idx| {
            names
                .iter()
                .map(|name| column_value_string(df, name, idx))
                .collect()
        })
        .collect();
    (names, rows)
}
