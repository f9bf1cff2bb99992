use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{FailureStage, MigrationReport};

/// How a summary line is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Warning,
    Error,
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

impl SummaryLine {
    fn new(label: &'static str, value: impl ToString, tone: Tone) -> Self {
        Self {
            label,
            value: value.to_string(),
            tone,
        }
    }

    fn count(label: &'static str, count: usize, tone: Tone) -> Self {
        let tone = if count == 0 { Tone::Plain } else { tone };
        Self::new(label, count, tone)
    }
}

pub fn summary_lines(report: &MigrationReport) -> Vec<SummaryLine> {
    let destination = if report.dry_run {
        format!("{} (dry run)", report.destination)
    } else {
        report.destination.clone()
    };
    let mut lines = vec![
        SummaryLine::new("Source", &report.source, Tone::Plain),
        SummaryLine::new("Destination", destination, Tone::Plain),
        SummaryLine::count("Rows read", report.rows_read, Tone::Plain),
        SummaryLine::count("English rows", report.english_rows, Tone::Plain),
        SummaryLine::count("Spanish rows", report.spanish_rows, Tone::Plain),
        SummaryLine::count(
            "Dropped (language)",
            report.unrecognized_language,
            Tone::Warning,
        ),
    ];
    if report.spanish_skipped > 0 {
        lines.push(SummaryLine::count(
            "Spanish not migrated",
            report.spanish_skipped,
            Tone::Warning,
        ));
    }
    lines.extend([
        SummaryLine::count("Transformed", report.transformed, Tone::Plain),
        SummaryLine::count("Phones omitted", report.phones_omitted, Tone::Warning),
        SummaryLine::count("Postal unresolved", report.postal_unresolved, Tone::Warning),
        SummaryLine::count("Already migrated", report.already_migrated, Tone::Plain),
        SummaryLine::count("Written", report.written, Tone::Good),
        SummaryLine::count(
            "Written without phone",
            report.written_without_phone,
            Tone::Warning,
        ),
        SummaryLine::count("Failed writes", report.failed_writes(), Tone::Error),
    ]);
    if let Some(count) = report.exported {
        lines.push(SummaryLine::count("Exported", count, Tone::Plain));
    }
    if let Some(retention) = report.retention {
        lines.push(SummaryLine::count("Flagged", retention.flagged, Tone::Warning));
        lines.push(SummaryLine::count("Deleted", retention.deleted, Tone::Warning));
        let failed = report
            .failures
            .iter()
            .filter(|failure| failure.stage == FailureStage::Retention)
            .count();
        lines.push(SummaryLine::count("Failed retention", failed, Tone::Error));
    }
    lines
}

pub fn summary_table(report: &MigrationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Migration"), header_cell("Result")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for line in summary_lines(report) {
        table.add_row(vec![Cell::new(line.label), value_cell(&line.value, line.tone)]);
    }
    table
}

pub fn failure_table(report: &MigrationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Row"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(failure.stage).fg(Color::Red),
            Cell::new(&failure.row),
            Cell::new(&failure.message),
        ]);
    }
    table
}

/// Summary on stdout, failures on stderr.
pub fn print_summary(report: &MigrationReport) {
    println!("{}", summary_table(report));
    if report.has_errors() {
        eprintln!("Failures:");
        eprintln!("{}", failure_table(report));
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: &str, tone: Tone) -> Cell {
    match tone {
        Tone::Plain => Cell::new(value),
        Tone::Good => Cell::new(value).fg(Color::Green),
        Tone::Warning => Cell::new(value).fg(Color::Yellow),
        Tone::Error => Cell::new(value)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}
