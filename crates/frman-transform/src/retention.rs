//! Age-based cleanup of destination records.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use frman_config::{RetentionConfig, RetentionMode};
use frman_ingest::{column_value_string, has_column, is_truthy};
use frman_model::RecordId;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, missing_column};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionRule {
    /// Timestamp column.
    pub field: String,
    pub max_age_days: u32,
    pub action: RetentionMode,
    pub flag_field: String,
}

impl From<&RetentionConfig> for RetentionRule {
    fn from(config: &RetentionConfig) -> Self {
        Self {
            field: config.field.clone(),
            max_age_days: config.max_age_days,
            action: config.action,
            flag_field: config.flag_field.clone(),
        }
    }
}

impl RetentionRule {
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - TimeDelta::days(i64::from(self.max_age_days))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionAction {
    /// Set `field` to `true` on the record.
    Flag { id: RecordId, field: String },
    Delete { id: RecordId },
}

impl RetentionAction {
    pub fn id(&self) -> &str {
        match self {
            Self::Flag { id, .. } | Self::Delete { id } => id,
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One action per row whose timestamp is older than the rule allows.
///
/// Rows with blank or unparsable timestamps, blank identifiers, or an
/// already-set flag field are left alone.
pub fn select_expired(
    df: &DataFrame,
    id_column: &str,
    rule: &RetentionRule,
    now: DateTime<Utc>,
) -> Result<Vec<RetentionAction>> {
    for column in [id_column, rule.field.as_str()] {
        if !has_column(df, column) {
            return Err(missing_column(column));
        }
    }
    let threshold = rule.threshold(now);
    let check_flag = rule.action == RetentionMode::Flag && has_column(df, &rule.flag_field);

    let mut actions = Vec::new();
    for idx in 0..df.height() {
        let id = column_value_string(df, id_column, idx);
        if id.trim().is_empty() {
            continue;
        }
        let Some(timestamp) = parse_timestamp(&column_value_string(df, &rule.field, idx)) else {
            continue;
        };
        if timestamp >= threshold {
            continue;
        }
        if check_flag && is_truthy(&column_value_string(df, &rule.flag_field, idx)) {
            continue;
        }
        debug!(record = %id, %timestamp, "record past retention");
        actions.push(match rule.action {
            RetentionMode::Flag => RetentionAction::Flag {
                id,
                field: rule.flag_field.clone(),
            },
            RetentionMode::Delete => RetentionAction::Delete { id },
        });
    }
    Ok(actions)
}
