//! Tests for retention selection.

use chrono::{TimeZone, Utc};
use frman_config::RetentionMode;
use frman_transform::{RetentionAction, RetentionRule, parse_timestamp, select_expired};
use polars::prelude::*;

fn rule(action: RetentionMode) -> RetentionRule {
    RetentionRule {
        field: "createdTime".to_string(),
        max_age_days: 30,
        action,
        flag_field: "Expired".to_string(),
    }
}

fn records() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), vec!["recOld", "recNew", "recFlagged", "recBlank", "recDate"])
            .into(),
        Series::new(
            "createdTime".into(),
            vec![
                "2026-01-01T08:00:00.000Z",
                "2026-03-10T08:00:00.000Z",
                "2025-12-01T00:00:00Z",
                "",
                "2026-01-15",
            ],
        )
        .into(),
        Series::new("Expired".into(), vec!["", "", "true", "", ""]).into(),
    ])
    .unwrap()
}

#[test]
fn flags_only_rows_past_the_threshold() {
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
    let actions = select_expired(&records(), "id", &rule(RetentionMode::Flag), now).unwrap();
    assert_eq!(
        actions,
        vec![
            RetentionAction::Flag {
                id: "recOld".to_string(),
                field: "Expired".to_string()
            },
            RetentionAction::Flag {
                id: "recDate".to_string(),
                field: "Expired".to_string()
            },
        ]
    );
}

#[test]
fn delete_ignores_existing_flags() {
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
    let actions = select_expired(&records(), "id", &rule(RetentionMode::Delete), now).unwrap();
    let ids: Vec<&str> = actions.iter().map(RetentionAction::id).collect();
    assert_eq!(ids, vec!["recOld", "recFlagged", "recDate"]);
}

#[test]
fn nothing_expires_before_the_threshold() {
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
    let actions = select_expired(&records(), "id", &rule(RetentionMode::Delete), now).unwrap();
    let ids: Vec<&str> = actions.iter().map(RetentionAction::id).collect();
    assert_eq!(ids, vec!["recFlagged"]);
}

#[test]
fn timestamps_parse_in_both_forms() {
    assert_eq!(
        parse_timestamp("2026-01-15"),
        Some(Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap())
    );
    assert!(parse_timestamp("2026-01-15T10:00:00+02:00").is_some());
    assert!(parse_timestamp("last week").is_none());
}
