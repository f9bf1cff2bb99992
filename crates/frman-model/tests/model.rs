//! Tests for frman-model types.

use frman_model::{
    DestinationFields, DestinationRecord, IntakeColumns, IntakeRow, Language, ModelError,
};
use serde_json::json;

fn sample_record() -> DestinationRecord {
    DestinationRecord {
        name: "Ana Lopez".to_string(),
        email: "ana@example.org".to_string(),
        phone: Some("(555) 123-4567".to_string()),
        postal_ref: Some("recCityA".to_string()),
        services: vec!["Groceries".to_string(), "Other".to_string()],
        details: "Phone:\n(555) 123-4567".to_string(),
        language: Language::English,
        source_key: Some("abc123".to_string()),
    }
}

#[test]
fn intake_row_reads_missing_columns_as_empty() {
    let row = IntakeRow::new().with("zip", " 12345 ").with("needs", "Food");
    assert_eq!(row.get("zip"), " 12345 ");
    assert_eq!(row.value("zip"), Some("12345"));
    assert_eq!(row.get("phone"), "");
    assert_eq!(row.value("phone"), None);
    assert_eq!(row.len(), 2);
}

#[test]
fn intake_fields_follow_column_mapping() {
    let columns = IntakeColumns {
        postal_code: "Zip Code".to_string(),
        ..IntakeColumns::default()
    };
    let row: IntakeRow = [("Zip Code", "67890"), ("needs", "Water, ")]
        .into_iter()
        .collect();
    let fields = row.fields(&columns);
    assert_eq!(fields.postal_code, "67890");
    assert_eq!(fields.needs, "Water, ");
    assert_eq!(fields.name, "");
}

#[test]
fn record_fields_use_configured_names() {
    let record = sample_record();
    let fields = record.to_fields(&DestinationFields::default());
    assert_eq!(fields.get("Name"), Some(&json!("Ana Lopez")));
    assert_eq!(fields.get("Phone"), Some(&json!("(555) 123-4567")));
    assert_eq!(fields.get("City"), Some(&json!(["recCityA"])));
    assert_eq!(fields.get("Services"), Some(&json!(["Groceries", "Other"])));
    assert_eq!(fields.get("Language"), Some(&json!("english")));
    assert!(fields.get("Source Key").is_none());
}

#[test]
fn record_fields_skip_blank_and_absent_values() {
    let record = DestinationRecord {
        email: "  ".to_string(),
        postal_ref: None,
        services: Vec::new(),
        ..sample_record()
    };
    let names = DestinationFields {
        postal_link: false,
        source_key: Some("Source Key".to_string()),
        language: None,
        ..DestinationFields::default()
    };
    let fields = record.to_fields(&names);
    assert!(fields.get("Email").is_none());
    assert!(fields.get("City").is_none());
    assert!(fields.get("Services").is_none());
    assert!(fields.get("Language").is_none());
    assert_eq!(fields.get("Source Key"), Some(&json!("abc123")));
}

#[test]
fn without_phone_drops_only_phone() {
    let record = sample_record();
    let retry = record.without_phone();
    assert_eq!(retry.phone, None);
    assert_eq!(retry.name, record.name);
    assert!(
        !retry
            .to_fields(&DestinationFields::default())
            .contains_key("Phone")
    );
}

#[test]
fn language_parses_tags() {
    assert_eq!("English".parse::<Language>().unwrap(), Language::English);
    assert_eq!("es".parse::<Language>().unwrap(), Language::Spanish);
    assert!(matches!(
        "klingon".parse::<Language>(),
        Err(ModelError::UnknownLanguage(_))
    ));
    assert_eq!(Language::Spanish.to_string(), "spanish");
}
