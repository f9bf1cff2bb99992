//! Tests for the in-memory store.

use frman_ingest::column_strings;
use frman_model::Fields;
use frman_store::{MemoryStore, RecordStore, StoreError, TableSelector};
use serde_json::json;

fn named(name: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("Name".to_string(), json!(name));
    fields
}

#[test]
fn assigns_ids_and_reads_like_a_hosted_table() {
    let mut store = MemoryStore::new("Requests").with_record(named("Old"), "2025-01-01T00:00:00.000Z");
    let id = store.write_row(&named("Ana")).unwrap();

    let df = store.read_table(&TableSelector::all()).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(column_strings(&df, "Name").unwrap(), vec!["Old", "Ana"]);
    assert_eq!(
        column_strings(&df, "createdTime").unwrap()[0],
        "2025-01-01T00:00:00.000Z"
    );
    assert_eq!(column_strings(&df, "id").unwrap()[1], id);
}

#[test]
fn rejects_configured_field() {
    let mut store = MemoryStore::new("Requests").rejecting_field("Phone");
    let mut fields = named("Ana");
    fields.insert("Phone".to_string(), json!("not a phone"));

    assert!(matches!(
        store.write_row(&fields),
        Err(StoreError::Rejected { .. })
    ));
    fields.remove("Phone");
    store.write_row(&fields).unwrap();
    assert_eq!(store.write_attempts(), 2);
    assert_eq!(store.records().len(), 1);
}

#[test]
fn update_and_delete_by_id() {
    let mut store = MemoryStore::new("Requests");
    let id = store.write_row(&named("Ana")).unwrap();
    let mut flag = Fields::new();
    flag.insert("Expired".to_string(), json!(true));
    store.update_row(&id, &flag).unwrap();
    assert_eq!(store.record(&id).unwrap().fields.get("Expired"), Some(&json!(true)));

    store.delete_row(&id).unwrap();
    assert!(store.records().is_empty());
    assert!(matches!(
        store.delete_row(&id),
        Err(StoreError::UnknownRecord { .. })
    ));
}
