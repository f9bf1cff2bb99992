//! Integration tests for the migration pipeline, run against in-memory
//! stores.

use chrono::{DateTime, Utc};
use frman_cli::pipeline::{
    MigrationOptions, MigrationStores, WriteOutcome, run_migration, survey_needs, write_record,
};
use frman_cli::types::{FailureStage, MigrationReport};
use frman_config::{MigrationSection, RetentionConfig, RetentionMode, Vocabulary};
use frman_ingest::frame_from_records;
use frman_model::{DestinationFields, DestinationRecord, Fields, Language};
use frman_store::MemoryStore;
use serde_json::{Value, json};

const ENGLISH: &str = "I prefer to respond in English.";
const SPANISH: &str = "Prefiero responder en espanol.";
const SEEDED: &str = "2024-05-01T00:00:00.000Z";

fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("object literal")
}

fn intake(name: &str, phone: &str, needs: &str, language: &str) -> Fields {
    fields(json!({
        "name": name,
        "phone": phone,
        "email": format!("{}@example.org", name.to_lowercase()),
        "zip": "12345",
        "needs": needs,
        "language_pref": language,
    }))
}

fn vocabulary() -> Vocabulary {
    Vocabulary::identity(["Food", "Water"])
}

fn cities() -> MemoryStore {
    MemoryStore::new("Cities").with_record(fields(json!({"Zip": "12345"})), SEEDED)
}

fn now() -> DateTime<Utc> {
    "2024-06-01T00:00:00Z".parse().expect("valid timestamp")
}

fn migrate(
    settings: &MigrationSection,
    source: &MemoryStore,
    destination: &mut MemoryStore,
    options: &MigrationOptions,
) -> MigrationReport {
    let reference = cities();
    let stores = MigrationStores {
        source,
        reference: &reference,
        destination,
    };
    run_migration(settings, &vocabulary(), stores, options, now()).expect("migration runs")
}

#[test]
fn migrates_english_rows_end_to_end() {
    let source = MemoryStore::new("Requests")
        .with_record(
            intake("Ana", "5551234567", "Food, Water, extra blankets", ENGLISH),
            SEEDED,
        )
        .with_record(intake("Luis", "5559876543", "Food", SPANISH), SEEDED)
        .with_record(intake("Kim", "", "Water", "Maybe later"), SEEDED);
    let mut destination = MemoryStore::new("Requests");

    let report = migrate(
        &MigrationSection::default(),
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.english_rows, 1);
    assert_eq!(report.spanish_rows, 1);
    assert_eq!(report.unrecognized_language, 1);
    assert_eq!(report.spanish_skipped, 1);
    assert_eq!(report.transformed, 1);
    assert_eq!(report.written, 1);
    assert!(!report.has_errors());
    assert!(report.retention.is_none());

    let records = destination.records();
    assert_eq!(records.len(), 1);
    let written = &records[0].fields;
    assert_eq!(written.get("Name"), Some(&json!("Ana")));
    assert_eq!(
        written.get("Services"),
        Some(&json!(["Food", "Water", "Other"]))
    );
    assert_eq!(written.get("City"), Some(&json!(["mem00001"])));
    assert_eq!(written.get("Phone"), Some(&json!("(555) 123-4567")));
    assert_eq!(written.get("Language"), Some(&json!("english")));
}

#[test]
fn spanish_rows_are_migrated_when_enabled() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "5551234567", "Food", ENGLISH), SEEDED)
        .with_record(intake("Luis", "5559876543", "Water", SPANISH), SEEDED);
    let mut destination = MemoryStore::new("Requests");
    let settings = MigrationSection {
        include_spanish: true,
        ..MigrationSection::default()
    };

    let report = migrate(
        &settings,
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    assert_eq!(report.written, 2);
    assert_eq!(report.spanish_skipped, 0);
    let languages: Vec<&Value> = destination
        .records()
        .iter()
        .filter_map(|record| record.fields.get("Language"))
        .collect();
    assert_eq!(languages, vec![&json!("english"), &json!("spanish")]);
}

#[test]
fn rejected_write_is_retried_without_phone() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "5551234567", "Food", ENGLISH), SEEDED);
    let mut destination = MemoryStore::new("Requests").rejecting_field("Phone");

    let report = migrate(
        &MigrationSection::default(),
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    assert_eq!(report.written, 1);
    assert_eq!(report.written_without_phone, 1);
    assert_eq!(destination.write_attempts(), 2);
    assert!(!destination.records()[0].fields.contains_key("Phone"));
    assert!(!report.has_errors());
}

#[test]
fn failed_writes_are_reported_and_the_batch_continues() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "5551234567", "Food", ENGLISH), SEEDED)
        .with_record(intake("Kim", "", "Water", ENGLISH), SEEDED);
    let mut destination = MemoryStore::new("Requests").rejecting_field("Services");

    let report = migrate(
        &MigrationSection::default(),
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    assert_eq!(report.written, 0);
    assert_eq!(report.failed_writes(), 2);
    assert!(report.has_errors());
    assert_eq!(report.failures[0].row, "english row 1");
    assert_eq!(report.failures[0].stage, FailureStage::Write);
    // Ana is retried without her phone, Kim has none to drop.
    assert_eq!(destination.write_attempts(), 3);
}

#[test]
fn record_without_phone_is_not_retried() {
    let mut destination = MemoryStore::new("Requests").rejecting_field("Name");
    let record = DestinationRecord {
        name: "Kim".to_string(),
        email: String::new(),
        phone: None,
        postal_ref: None,
        services: vec!["Water".to_string()],
        details: String::new(),
        language: Language::English,
        source_key: None,
    };

    let result = write_record(&mut destination, &record, &DestinationFields::default());

    assert!(result.is_err());
    assert_eq!(destination.write_attempts(), 1);
}

#[test]
fn accepted_write_reports_the_new_id() {
    let mut destination = MemoryStore::new("Requests");
    let record = DestinationRecord {
        name: "Ana".to_string(),
        email: String::new(),
        phone: Some("(555) 123-4567".to_string()),
        postal_ref: None,
        services: Vec::new(),
        details: String::new(),
        language: Language::English,
        source_key: None,
    };

    let outcome = write_record(&mut destination, &record, &DestinationFields::default())
        .expect("write accepted");

    assert_eq!(outcome, WriteOutcome::Written("mem00001".to_string()));
    assert_eq!(outcome.id(), "mem00001");
}

#[test]
fn source_keys_skip_rows_already_migrated() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "5551234567", "Food", ENGLISH), SEEDED)
        .with_record(intake("Ana", "5551234567", "Food", ENGLISH), SEEDED)
        .with_record(intake("Kim", "", "Water", ENGLISH), SEEDED);
    let mut destination = MemoryStore::new("Requests");
    let mut settings = MigrationSection::default();
    settings.destination.fields.source_key = Some("Source Key".to_string());

    let first = migrate(
        &settings,
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );
    assert_eq!(first.written, 2);
    assert_eq!(first.already_migrated, 1);

    let second = migrate(
        &settings,
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );
    assert_eq!(second.written, 0);
    assert_eq!(second.already_migrated, 3);
    assert_eq!(destination.records().len(), 2);
}

#[test]
fn limit_caps_rows_read() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "", "Food", ENGLISH), SEEDED)
        .with_record(intake("Kim", "", "Water", ENGLISH), SEEDED)
        .with_record(intake("Lee", "", "Food", ENGLISH), SEEDED);
    let mut destination = MemoryStore::new("Requests");
    let options = MigrationOptions {
        limit: Some(2),
        ..MigrationOptions::default()
    };

    let report = migrate(&MigrationSection::default(), &source, &mut destination, &options);

    assert_eq!(report.rows_read, 2);
    assert_eq!(report.written, 2);
}

fn retention(action: RetentionMode) -> RetentionConfig {
    RetentionConfig {
        field: "createdTime".to_string(),
        max_age_days: 30,
        action,
        flag_field: "Expired".to_string(),
        id_column: "id".to_string(),
    }
}

fn aged_destination() -> MemoryStore {
    MemoryStore::new("Requests")
        .with_record(fields(json!({"Name": "Old"})), "2024-01-15T00:00:00.000Z")
        .with_record(fields(json!({"Name": "Recent"})), "2024-05-20T00:00:00.000Z")
        .with_record(
            fields(json!({"Name": "Flagged", "Expired": true})),
            "2024-01-10T00:00:00.000Z",
        )
}

#[test]
fn retention_flags_only_old_records() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "", "Food", ENGLISH), SEEDED);
    let mut destination = aged_destination();
    let settings = MigrationSection {
        retention: Some(retention(RetentionMode::Flag)),
        ..MigrationSection::default()
    };

    let report = migrate(
        &settings,
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    let summary = report.retention.expect("retention ran");
    assert_eq!(summary.flagged, 1);
    assert_eq!(summary.deleted, 0);
    let old = destination.record("mem00001").expect("old record kept");
    assert_eq!(old.fields.get("Expired"), Some(&json!(true)));
    let recent = destination.record("mem00002").expect("recent record kept");
    assert!(recent.fields.get("Expired").is_none());
}

#[test]
fn retention_delete_removes_old_records() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "", "Food", ENGLISH), SEEDED);
    let mut destination = aged_destination();
    let settings = MigrationSection {
        retention: Some(retention(RetentionMode::Delete)),
        ..MigrationSection::default()
    };

    let report = migrate(
        &settings,
        &source,
        &mut destination,
        &MigrationOptions::default(),
    );

    assert_eq!(report.retention.map(|summary| summary.deleted), Some(2));
    let names: Vec<&Value> = destination
        .records()
        .iter()
        .filter_map(|record| record.fields.get("Name"))
        .collect();
    assert_eq!(names, vec![&json!("Recent"), &json!("Ana")]);
}

#[test]
fn skip_retention_leaves_destination_alone() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "", "Food", ENGLISH), SEEDED);
    let mut destination = aged_destination();
    let settings = MigrationSection {
        retention: Some(retention(RetentionMode::Delete)),
        ..MigrationSection::default()
    };
    let options = MigrationOptions {
        skip_retention: true,
        ..MigrationOptions::default()
    };

    let report = migrate(&settings, &source, &mut destination, &options);

    assert!(report.retention.is_none());
    assert_eq!(destination.records().len(), 4);
}

#[test]
fn export_writes_transformed_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("records.csv");
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "5551234567", "Food, Water", ENGLISH), SEEDED);
    let mut destination = MemoryStore::new("Requests");
    let options = MigrationOptions {
        dry_run: true,
        export: Some(path.clone()),
        ..MigrationOptions::default()
    };

    let report = migrate(&MigrationSection::default(), &source, &mut destination, &options);

    assert_eq!(report.exported, Some(1));
    let mut reader = csv::Reader::from_path(&path).expect("export readable");
    let headers = reader.headers().expect("header row").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Name", "Email", "Phone", "City", "Services", "Details", "Language"]
    );
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][2], "(555) 123-4567");
    assert_eq!(&rows[0][3], "mem00001");
    assert_eq!(&rows[0][4], "Food, Water");
}

#[test]
fn unknown_region_stops_before_reading() {
    let source = MemoryStore::new("Requests");
    let reference = cities();
    let mut destination = MemoryStore::new("Requests");
    let settings = MigrationSection {
        default_region: "Atlantis".to_string(),
        ..MigrationSection::default()
    };
    let stores = MigrationStores {
        source: &source,
        reference: &reference,
        destination: &mut destination,
    };

    let result = run_migration(
        &settings,
        &vocabulary(),
        stores,
        &MigrationOptions::default(),
        now(),
    );

    assert!(result.is_err());
    assert_eq!(destination.write_attempts(), 0);
}

#[test]
fn reference_without_postal_column_is_fatal() {
    let source = MemoryStore::new("Requests")
        .with_record(intake("Ana", "", "Food", ENGLISH), SEEDED);
    let reference =
        MemoryStore::new("Cities").with_record(fields(json!({"Name": "Springfield"})), SEEDED);
    let mut destination = MemoryStore::new("Requests");
    let stores = MigrationStores {
        source: &source,
        reference: &reference,
        destination: &mut destination,
    };

    let result = run_migration(
        &MigrationSection::default(),
        &vocabulary(),
        stores,
        &MigrationOptions::default(),
        now(),
    );

    let message = format!("{:#}", result.expect_err("missing Zip column"));
    assert!(message.contains("Zip"), "{message}");
    assert!(destination.records().is_empty());
}

#[test]
fn needs_survey_groups_identical_answers() {
    let header = vec!["needs".to_string()];
    let rows = vec![
        vec!["Food, Water".to_string()],
        vec!["Food, blankets".to_string()],
        vec!["Food, Water".to_string()],
        vec![" ".to_string()],
    ];
    let frame = frame_from_records(&header, &rows).expect("frame builds");

    let surveys = survey_needs(&frame, &vocabulary()).expect("survey runs");

    assert_eq!(surveys.len(), 2);
    assert_eq!(surveys[0].answer, "Food, Water");
    assert_eq!(surveys[0].rows, 2);
    assert_eq!(surveys[0].matched.needs, vec!["Food", "Water"]);
    assert_eq!(surveys[1].matched.needs, vec!["Food", "Other"]);
    assert_eq!(surveys[1].matched.remainder, "blankets");
}
