//! FRMAN intake migration CLI.

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{ColorChoice, Parser};
use frman_cli::logging::{LogConfig, LogFormat, init_logging};
use frman_cli::summary::print_summary;
use frman_config::{AppConfig, LoggerSection};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_migrate, run_needs, run_snapshot};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("load config {}", cli.config.display()));
    let logger = config
        .as_ref()
        .map(|config| config.logger.clone())
        .unwrap_or_default();
    let log_config = log_config_from_cli(&cli, &logger);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match config {
        Ok(config) => run(&cli.command, &config),
        Err(error) => {
            error!("{error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: &Command, config: &AppConfig) -> i32 {
    let result = match command {
        Command::Migrate(args) => run_migrate(args, config).map(|report| {
            print_summary(&report);
            i32::from(report.has_errors())
        }),
        Command::Needs(args) => run_needs(args, config).map(|()| 0),
        Command::Snapshot(args) => run_snapshot(args, config).map(|()| 0),
    };
    result.unwrap_or_else(|error| {
        error!("{error:#}");
        eprintln!("error: {error:#}");
        1
    })
}

/// Build logging configuration. Command-line flags win over the `logger`
/// section of the config file.
fn log_config_from_cli(cli: &Cli, logger: &LoggerSection) -> LogConfig {
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(cli.verbosity.tracing_level_filter())
        .with_format(format)
        .with_log_file(cli.log_file.clone().or_else(|| logger.file.clone()))
        .with_timestamps(cli.log_timestamps || logger.timestamps.unwrap_or(false))
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    } else if !cli.verbosity.is_present()
        && let Some(level) = logger
            .level
            .as_deref()
            .and_then(|level| level.parse::<LevelFilter>().ok())
    {
        config.level_filter = level;
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
