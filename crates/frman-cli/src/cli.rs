//! CLI argument definitions for `frman`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use frman_config::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(
    name = "frman",
    version,
    about = "FRMAN intake migration - move intake-form responses between record stores",
    long_about = "Move intake-form responses from the intake spreadsheet (or a SQLite or CSV \
                  snapshot) into the requests table.\n\n\
                  Rows are split by language, needs are matched against the controlled \
                  vocabulary, postal codes and phone numbers are resolved, and stale \
                  destination records are flagged or deleted afterwards."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config.yml.
    #[arg(
        long = "config",
        value_name = "PATH",
        env = CONFIG_ENV_VAR,
        default_value = DEFAULT_CONFIG_PATH,
        global = true
    )]
    pub config: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and the config file).
    #[arg(
        long = "log-level",
        value_enum,
        env = "LOG_LEVEL",
        ignore_case = true,
        global = true
    )]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", env = "LOG_FILENAME", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", env = "LOG_TIMESTAMP", global = true)]
    pub log_timestamps: bool,

    /// Allow names, phone numbers and other intake values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transform intake rows and write them to the destination table.
    Migrate(MigrateArgs),

    /// List distinct needs answers and how the vocabulary matches them.
    Needs(NeedsArgs),

    /// Copy the intake table into the SQLite snapshot database.
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Transform and report without writing to the destination.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the transformed records to a CSV file.
    #[arg(long = "export", value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Only migrate the first N intake rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Do not flag or delete old destination records.
    #[arg(long = "skip-retention")]
    pub skip_retention: bool,
}

#[derive(Args)]
pub struct NeedsArgs {
    /// Only list answers that fall through to "Other".
    #[arg(long = "other-only")]
    pub other_only: bool,
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// SQLite table to write.
    #[arg(long = "table", default_value = "intake")]
    pub table: String,

    /// Drop and recreate the table instead of appending.
    #[arg(long = "replace")]
    pub replace: bool,

    /// Column identifying a row; existing rows with the same value are
    /// replaced.
    #[arg(long = "key", value_name = "COLUMN")]
    pub key: Option<String>,

    /// Run VACUUM after the copy.
    #[arg(long = "vacuum")]
    pub vacuum: bool,

    /// Also overwrite this worksheet with the copied rows.
    #[arg(long = "sheet", value_name = "WORKSHEET")]
    pub sheet: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
