//! Tests for the postal lookup and phone formatter.

use frman_model::{PhoneOmission, PhoneOutcome, PostalResolution};
use frman_transform::{PhoneFormatter, PostalLookup, TransformError};
use polars::prelude::*;

#[test]
fn postal_lookup_from_id_code_pairs() {
    let lookup = PostalLookup::from_pairs([("id1", "12345"), ("id2", "67890")]);
    assert_eq!(
        lookup.resolve("12345"),
        PostalResolution::Resolved("id1".to_string())
    );
    assert_eq!(lookup.resolve(" 67890 "), PostalResolution::Resolved("id2".to_string()));
    assert_eq!(lookup.resolve("00000"), PostalResolution::Unresolved);
    assert_eq!(lookup.resolve(""), PostalResolution::Unresolved);
}

#[test]
fn postal_lookup_from_reference_frame() {
    let df = DataFrame::new(vec![
        Series::new("id".into(), vec!["recA", "recB", "recC", "recD"]).into(),
        Series::new("Zip".into(), vec!["12345 ", "12345", "", "54321"]).into(),
    ])
    .unwrap();
    let lookup = PostalLookup::from_frame(&df, "id", "Zip").unwrap();
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.resolve("12345").id(), Some("recA"));
    assert_eq!(lookup.resolve("54321").id(), Some("recD"));
}

#[test]
fn postal_lookup_requires_columns() {
    let df = DataFrame::new(vec![Series::new("id".into(), vec!["recA"]).into()]).unwrap();
    let err = PostalLookup::from_frame(&df, "id", "Zip").unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column } if column == "Zip"));
}

#[test]
fn us_number_in_national_format() {
    let formatter = PhoneFormatter::new("US").unwrap();
    assert_eq!(
        formatter.format("5551234567"),
        PhoneOutcome::Formatted("(555) 123-4567".to_string())
    );
    assert_eq!(
        formatter.format("555-123-4567"),
        PhoneOutcome::Formatted("(555) 123-4567".to_string())
    );
}

#[test]
fn unusable_numbers_are_omitted() {
    let formatter = PhoneFormatter::new("US").unwrap();
    assert_eq!(
        formatter.format("abc"),
        PhoneOutcome::Omitted(PhoneOmission::Unparsable)
    );
    assert_eq!(formatter.format("  "), PhoneOutcome::Omitted(PhoneOmission::Blank));
    assert_eq!(
        formatter.format("555123"),
        PhoneOutcome::Omitted(PhoneOmission::InvalidLength)
    );
}
