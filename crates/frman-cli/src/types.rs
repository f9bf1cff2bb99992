use std::fmt;

/// Where a row failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Write,
    Retention,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Write => "write",
            Self::Retention => "retention",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub stage: FailureStage,
    /// `english row 3` for intake rows, the record id for retention.
    pub row: String,
    pub message: String,
}

/// Counts for one migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub source: String,
    pub destination: String,
    pub dry_run: bool,
    pub rows_read: usize,
    pub english_rows: usize,
    pub spanish_rows: usize,
    /// Rows whose language answer matched neither literal; dropped.
    pub unrecognized_language: usize,
    /// Spanish rows left out because `include_spanish` is off.
    pub spanish_skipped: usize,
    pub transformed: usize,
    /// Rows whose source key is already in the destination.
    pub already_migrated: usize,
    pub written: usize,
    /// Writes that only succeeded after dropping the phone field.
    pub written_without_phone: usize,
    pub phones_omitted: usize,
    pub postal_unresolved: usize,
    pub exported: Option<usize>,
    /// `None` when retention did not run.
    pub retention: Option<RetentionSummary>,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionSummary {
    pub flagged: usize,
    pub deleted: usize,
}

impl MigrationReport {
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed_writes(&self) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.stage == FailureStage::Write)
            .count()
    }
}
