//! Migration pipeline: ingest, split, transform, write, retention.
//!
//! One batch, one pass, no threads. Configuration problems and failures
//! reading the source or reference tables stop the run; a failed write or
//! retention action is recorded in the report and the batch continues.

use std::collections::HashSet;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use frman_config::{MigrationSection, ReferenceSection, RetentionConfig, Vocabulary};
use frman_ingest::{column_strings, has_column, rows_from_frame};
use frman_model::{DestinationFields, DestinationRecord, Fields, Language, NeedsMatch, RecordId};
use frman_store::{RecordStore, StoreError, TableSelector};
use frman_transform::{
    PhoneFormatter, PostalLookup, RecordTransformer, RetentionAction, RetentionRule, RowNote,
    Transformed, normalize_needs, select_expired, split_by_language, unique_needs,
};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn};

use crate::export::export_records;
use crate::logging::redact_value;
use crate::types::{FailureStage, MigrationReport, RetentionSummary, RowFailure};

/// Run-level switches from the command line.
#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    /// Destination is an empty in-memory table; nothing remote is written.
    pub dry_run: bool,
    /// Only the first `limit` intake rows are read.
    pub limit: Option<usize>,
    pub skip_retention: bool,
    /// Write transformed records to this CSV before the write stage.
    pub export: Option<PathBuf>,
}

/// The three stores a run touches.
pub struct MigrationStores<'s> {
    pub source: &'s dyn RecordStore,
    pub reference: &'s dyn RecordStore,
    pub destination: &'s mut dyn RecordStore,
}

/// A transformed record waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    /// `english row 3`: language partition and 1-based position.
    pub label: String,
    pub record: DestinationRecord,
}

/// How a successful write went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(RecordId),
    /// Rejected with the phone field, accepted without it.
    WrittenWithoutPhone(RecordId),
}

impl WriteOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Written(id) | Self::WrittenWithoutPhone(id) => id,
        }
    }
}

pub fn run_migration(
    settings: &MigrationSection,
    vocabulary: &Vocabulary,
    stores: MigrationStores<'_>,
    options: &MigrationOptions,
    now: DateTime<Utc>,
) -> Result<MigrationReport> {
    let MigrationStores {
        source,
        reference,
        destination,
    } = stores;
    let phone = PhoneFormatter::new(&settings.default_region)
        .context("invalid migration.default_region")?;
    let mut report = MigrationReport {
        source: source.describe(),
        destination: destination.describe(),
        dry_run: options.dry_run,
        ..MigrationReport::default()
    };

    // Stage 1: read the intake table.
    let ingest_span = info_span!("ingest", source = %report.source);
    let ingest_start = Instant::now();
    let intake = ingest_span.in_scope(|| read_intake(source, options.limit))?;
    report.rows_read = intake.height();
    ingest_span.in_scope(|| {
        info!(
            rows = report.rows_read,
            duration_ms = ingest_start.elapsed().as_millis(),
            "intake rows read"
        );
    });

    // Stage 2: partition by language.
    let split_span = info_span!("split");
    let split = split_span
        .in_scope(|| split_by_language(&intake, &vocabulary.language_split()))
        .context("split intake rows by language")?;
    report.english_rows = split.english.height();
    report.spanish_rows = split.spanish.height();
    report.unrecognized_language = split.unrecognized;
    let mut languages = vec![Language::English];
    if settings.include_spanish {
        languages.push(Language::Spanish);
    } else {
        report.spanish_skipped = report.spanish_rows;
    }
    split_span.in_scope(|| {
        info!(
            english = report.english_rows,
            spanish = report.spanish_rows,
            dropped = report.unrecognized_language,
            include_spanish = settings.include_spanish,
            "intake rows split by language"
        );
    });

    // Stage 3: postal lookup from the reference table, then transform.
    let transform_span = info_span!("transform");
    let transform_start = Instant::now();
    let postal = transform_span.in_scope(|| load_postal_lookup(reference, &settings.reference))?;
    let transformer = RecordTransformer::new(vocabulary, &postal, &phone);
    let mut pending = Vec::new();
    for language in languages {
        let frame = split.frame(language);
        let records = transform_span.in_scope(|| {
            transform_frame(frame, language, &transformer, vocabulary, &mut report)
        })?;
        pending.extend(records);
    }
    report.transformed = pending.len();
    transform_span.in_scope(|| {
        info!(
            records = report.transformed,
            phones_omitted = report.phones_omitted,
            postal_unresolved = report.postal_unresolved,
            duration_ms = transform_start.elapsed().as_millis(),
            "intake rows transformed"
        );
    });

    if let Some(path) = &options.export {
        let records: Vec<DestinationRecord> =
            pending.iter().map(|item| item.record.clone()).collect();
        let count = export_records(path, &records, &settings.destination.fields)?;
        info!(path = %path.display(), records = count, "exported transformed records");
        report.exported = Some(count);
    }

    // Stage 4: write, skipping records already migrated.
    let write_span = info_span!("write", destination = %report.destination);
    let write_start = Instant::now();
    write_span.in_scope(|| {
        write_records(
            &mut *destination,
            &pending,
            &settings.destination.fields,
            &mut report,
        );
        info!(
            written = report.written,
            without_phone = report.written_without_phone,
            already_migrated = report.already_migrated,
            failed = report.failed_writes(),
            duration_ms = write_start.elapsed().as_millis(),
            "records written"
        );
    });

    // Stage 5: retention over the whole destination table.
    match &settings.retention {
        Some(config) if !options.skip_retention => {
            let retention_span = info_span!("retention", field = %config.field);
            let summary = retention_span.in_scope(|| {
                apply_retention(&mut *destination, config, now, &mut report.failures)
            });
            retention_span.in_scope(|| {
                info!(
                    flagged = summary.flagged,
                    deleted = summary.deleted,
                    "retention applied"
                );
            });
            report.retention = Some(summary);
        }
        Some(_) => info!("retention skipped"),
        None => debug!("no retention rule configured"),
    }

    Ok(report)
}

fn read_intake(source: &dyn RecordStore, limit: Option<usize>) -> Result<DataFrame> {
    let df = source
        .read_table(&TableSelector::all())
        .with_context(|| format!("read intake table from {}", source.describe()))?;
    Ok(match limit {
        Some(limit) if limit < df.height() => df.head(Some(limit)),
        _ => df,
    })
}

/// Build the postal code lookup from the reference table.
pub fn load_postal_lookup(
    reference: &dyn RecordStore,
    section: &ReferenceSection,
) -> Result<PostalLookup> {
    let df = reference
        .read_table(&TableSelector::all())
        .with_context(|| format!("read reference table from {}", reference.describe()))?;
    let lookup = PostalLookup::from_frame(&df, &section.id_column, &section.postal_column)
        .with_context(|| format!("build postal lookup from {}", reference.describe()))?;
    info!(
        reference = %reference.describe(),
        codes = lookup.len(),
        "postal lookup built"
    );
    Ok(lookup)
}

fn transform_frame(
    frame: &DataFrame,
    language: Language,
    transformer: &RecordTransformer<'_>,
    vocabulary: &Vocabulary,
    report: &mut MigrationReport,
) -> Result<Vec<PendingRecord>> {
    let mut pending = Vec::with_capacity(frame.height());
    for (idx, row) in rows_from_frame(frame).iter().enumerate() {
        let label = format!("{language} row {}", idx + 1);
        let Transformed { record, notes } = transformer
            .transform(row, language)
            .with_context(|| format!("transform {label}"))?;
        for note in &notes {
            match note {
                RowNote::PhoneOmitted(reason) => {
                    report.phones_omitted += 1;
                    warn!(
                        row = %label,
                        %reason,
                        phone = redact_value(row.get(&vocabulary.columns.phone)),
                        "phone number omitted"
                    );
                }
                RowNote::PostalUnresolved(code) => {
                    report.postal_unresolved += 1;
                    warn!(
                        row = %label,
                        postal_code = redact_value(code),
                        "postal code not in reference table"
                    );
                }
            }
        }
        debug!(row = %label, services = ?record.services, "row transformed");
        pending.push(PendingRecord { label, record });
    }
    Ok(pending)
}

/// Write one record. A rejected write is retried once without the phone
/// field when the record has one.
pub fn write_record(
    destination: &mut dyn RecordStore,
    record: &DestinationRecord,
    names: &DestinationFields,
) -> Result<WriteOutcome, StoreError> {
    match destination.write_row(&record.to_fields(names)) {
        Ok(id) => Ok(WriteOutcome::Written(id)),
        Err(err) if record.phone.is_some() => {
            warn!(error = %err, "write rejected, retrying without phone");
            destination
                .write_row(&record.without_phone().to_fields(names))
                .map(WriteOutcome::WrittenWithoutPhone)
        }
        Err(err) => Err(err),
    }
}

fn write_records(
    destination: &mut dyn RecordStore,
    pending: &[PendingRecord],
    names: &DestinationFields,
    report: &mut MigrationReport,
) {
    let mut migrated = match &names.source_key {
        Some(column) => existing_source_keys(destination, column),
        None => HashSet::new(),
    };
    let progress = write_progress(pending.len());
    for item in pending {
        progress.inc(1);
        let key = names
            .source_key
            .as_ref()
            .and(item.record.source_key.as_deref());
        if let Some(key) = key
            && migrated.contains(key)
        {
            report.already_migrated += 1;
            debug!(row = %item.label, source_key = key, "already migrated");
            continue;
        }
        match write_record(destination, &item.record, names) {
            Ok(outcome) => {
                report.written += 1;
                if matches!(outcome, WriteOutcome::WrittenWithoutPhone(_)) {
                    report.written_without_phone += 1;
                }
                debug!(row = %item.label, record = outcome.id(), "record written");
                if let Some(key) = key {
                    migrated.insert(key.to_string());
                }
            }
            Err(err) => {
                warn!(
                    row = %item.label,
                    name = redact_value(&item.record.name),
                    error = %err,
                    "record not written"
                );
                report.failures.push(RowFailure {
                    stage: FailureStage::Write,
                    row: item.label.clone(),
                    message: err.to_string(),
                });
            }
        }
    }
    progress.finish_and_clear();
}

/// Source keys already present in the destination. A destination that
/// cannot be read yet (a SQLite table not created) counts as empty.
fn existing_source_keys(destination: &dyn RecordStore, column: &str) -> HashSet<String> {
    let df = match destination.read_table(&TableSelector::all()) {
        Ok(df) => df,
        Err(err) => {
            warn!(
                destination = %destination.describe(),
                error = %err,
                "destination unreadable, assuming no migrated rows"
            );
            return HashSet::new();
        }
    };
    if !has_column(&df, column) {
        return HashSet::new();
    }
    match column_strings(&df, column) {
        Ok(keys) => keys
            .into_iter()
            .filter(|key| !key.trim().is_empty())
            .collect(),
        Err(err) => {
            warn!(column, error = %err, "could not read source keys");
            HashSet::new()
        }
    }
}

fn write_progress(len: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} writing [{bar:30}] {pos}/{len}") {
        bar.set_style(style);
    }
    bar
}

/// Flag or delete destination records past the retention age. Failures
/// are recorded per record; a destination that cannot be scanned is one
/// failure for the whole stage.
pub fn apply_retention(
    destination: &mut dyn RecordStore,
    config: &RetentionConfig,
    now: DateTime<Utc>,
    failures: &mut Vec<RowFailure>,
) -> RetentionSummary {
    let mut summary = RetentionSummary::default();
    let rule = RetentionRule::from(config);
    let actions = destination
        .read_table(&TableSelector::all())
        .map_err(anyhow::Error::from)
        .and_then(|df| {
            select_expired(&df, &config.id_column, &rule, now).map_err(anyhow::Error::from)
        });
    let actions = match actions {
        Ok(actions) => actions,
        Err(err) => {
            error!(destination = %destination.describe(), error = %err, "retention scan failed");
            failures.push(RowFailure {
                stage: FailureStage::Retention,
                row: destination.describe(),
                message: format!("{err:#}"),
            });
            return summary;
        }
    };
    for action in &actions {
        let result = match action {
            RetentionAction::Flag { id, field } => {
                let mut fields = Fields::new();
                fields.insert(field.clone(), Value::Bool(true));
                destination.update_row(id, &fields)
            }
            RetentionAction::Delete { id } => destination.delete_row(id),
        };
        match (result, action) {
            (Ok(()), RetentionAction::Flag { .. }) => summary.flagged += 1,
            (Ok(()), RetentionAction::Delete { .. }) => summary.deleted += 1,
            (Err(err), _) => {
                warn!(record = action.id(), error = %err, "retention action failed");
                failures.push(RowFailure {
                    stage: FailureStage::Retention,
                    row: action.id().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    summary
}

/// One distinct needs answer and how the vocabulary reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedsSurvey {
    pub answer: String,
    /// Rows giving exactly this answer.
    pub rows: usize,
    pub matched: NeedsMatch,
}

/// Distinct needs answers in `frame`, first-seen order, each matched
/// against the vocabulary. Used to find phrases worth adding.
pub fn survey_needs(frame: &DataFrame, vocabulary: &Vocabulary) -> Result<Vec<NeedsSurvey>> {
    let column = &vocabulary.columns.needs;
    let answers = column_strings(frame, column)
        .with_context(|| format!("read needs column '{column}'"))?;
    let surveys = unique_needs(&answers)
        .into_iter()
        .map(|answer| NeedsSurvey {
            rows: answers.iter().filter(|value| **value == answer).count(),
            matched: normalize_needs(&answer, &vocabulary.default_needs),
            answer,
        })
        .collect();
    Ok(surveys)
}
