//! Tests for CSV loading and frame conversion.

use std::collections::BTreeMap;
use std::io::Write;

use frman_ingest::{
    IngestError, column_strings, frame_from_maps, frame_from_records, frame_from_rows,
    read_csv_table, records_from_frame, rows_from_frame,
};
use frman_model::IntakeRow;
use tempfile::NamedTempFile;

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn csv_columns_load_as_text() {
    let file = create_temp_csv("name,zip,needs\nAna,01234,\"Food, Water\"\nBo,,Water\n");
    let df = read_csv_table(file.path()).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(
        column_strings(&df, "zip").unwrap(),
        vec!["01234".to_string(), String::new()]
    );

    let rows = rows_from_frame(&df);
    assert_eq!(rows[0].get("needs"), "Food, Water");
    assert_eq!(rows[1].get("name"), "Bo");
}

#[test]
fn missing_csv_is_reported() {
    let err = read_csv_table(std::path::Path::new("/nonexistent/intake.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn empty_csv_is_reported() {
    let file = create_temp_csv("");
    let err = read_csv_table(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyCsv { .. }));
}

#[test]
fn short_rows_are_padded() {
    let header = vec!["a".to_string(), "b".to_string()];
    let rows = vec![vec!["1".to_string()], vec!["2".to_string(), "3".to_string()]];
    let df = frame_from_records(&header, &rows).unwrap();
    assert_eq!(
        column_strings(&df, "b").unwrap(),
        vec![String::new(), "3".to_string()]
    );
}

#[test]
fn maps_union_columns_in_first_seen_order() {
    let first: BTreeMap<String, String> = [("id", "rec1"), ("Zip", "12345")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let second: BTreeMap<String, String> = [("id", "rec2"), ("State", "TX")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let df = frame_from_maps(&[first, second]).unwrap();
    let (header, rows) = records_from_frame(&df);
    assert_eq!(header, vec!["Zip", "id", "State"]);
    assert_eq!(rows[1], vec!["", "rec2", "TX"]);
}

#[test]
fn intake_rows_survive_a_frame() {
    let rows = vec![
        IntakeRow::new().with("zip", "12345").with("needs", "Food"),
        IntakeRow::new().with("zip", "67890"),
    ];
    let df = frame_from_rows(&rows).unwrap();
    let back = rows_from_frame(&df);
    assert_eq!(back[0], rows[0]);
    assert_eq!(back[1].get("zip"), "67890");
    assert_eq!(back[1].get("needs"), "");
}
