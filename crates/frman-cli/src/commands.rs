use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Table;
use frman_config::{AppConfig, Vocabulary};
use frman_model::{Language, OTHER_NEED};
use frman_store::{IfExists, MemoryStore, RecordStore, TableSelector};
use frman_transform::split_by_language;
use tracing::{info, info_span};

use frman_cli::pipeline::{MigrationOptions, MigrationStores, run_migration, survey_needs};
use frman_cli::stores::{open_sheets, open_source, open_sql, open_store};
use frman_cli::summary::apply_table_style;
use frman_cli::types::MigrationReport;

use crate::cli::{MigrateArgs, NeedsArgs, SnapshotArgs};

fn load_vocabulary(config: &AppConfig) -> Result<Vocabulary> {
    let path = config.vocabulary_path();
    Vocabulary::load(&path).with_context(|| format!("load vocabulary {}", path.display()))
}

pub fn run_migrate(args: &MigrateArgs, config: &AppConfig) -> Result<MigrationReport> {
    let migration = &config.migration;
    let span = info_span!("migrate", dry_run = args.dry_run);
    let _guard = span.enter();

    let vocabulary = load_vocabulary(config)?;
    let source = open_source(config)?;
    let reference = open_store(config, migration.reference.kind, &migration.reference.table)?;
    let mut destination: Box<dyn RecordStore> = if args.dry_run {
        info!("dry run: writes go to an in-memory table");
        Box::new(MemoryStore::new(&migration.destination.table))
    } else {
        open_store(
            config,
            migration.destination.kind,
            &migration.destination.table,
        )?
    };
    let options = MigrationOptions {
        dry_run: args.dry_run,
        limit: args.limit,
        skip_retention: args.skip_retention,
        export: args.export.clone(),
    };
    let stores = MigrationStores {
        source: source.as_ref(),
        reference: reference.as_ref(),
        destination: destination.as_mut(),
    };
    run_migration(migration, &vocabulary, stores, &options, Utc::now())
}

pub fn run_needs(args: &NeedsArgs, config: &AppConfig) -> Result<()> {
    let vocabulary = load_vocabulary(config)?;
    let source = open_source(config)?;
    let intake = source
        .read_table(&TableSelector::all())
        .with_context(|| format!("read intake table from {}", source.describe()))?;
    let split = split_by_language(&intake, &vocabulary.language_split())?;

    let mut table = Table::new();
    table.set_header(vec!["Language", "Rows", "Answer", "Needs", "Remainder"]);
    apply_table_style(&mut table);
    let mut listed = 0usize;
    for language in [Language::English, Language::Spanish] {
        for survey in survey_needs(split.frame(language), &vocabulary)? {
            let is_other = survey.matched.needs.iter().any(|need| need == OTHER_NEED);
            if args.other_only && !is_other {
                continue;
            }
            listed += 1;
            table.add_row(vec![
                language.to_string(),
                survey.rows.to_string(),
                survey.answer,
                survey.matched.needs.join(", "),
                survey.matched.remainder,
            ]);
        }
    }
    println!("{table}");
    println!("{listed} distinct answers");
    Ok(())
}

pub fn run_snapshot(args: &SnapshotArgs, config: &AppConfig) -> Result<()> {
    let span = info_span!("snapshot", table = %args.table);
    let _guard = span.enter();

    let source = open_source(config)?;
    let intake = source
        .read_table(&TableSelector::all())
        .with_context(|| format!("read intake table from {}", source.describe()))?;
    let store = open_sql(config, &args.table)?;
    let if_exists = if args.replace {
        IfExists::Replace
    } else {
        IfExists::Append
    };
    let rows = store
        .ingest_frame(&intake, &args.table, if_exists, args.key.as_deref())
        .with_context(|| format!("write SQLite table {}", args.table))?;
    if args.vacuum {
        store.vacuum()?;
    }
    println!(
        "Copied {rows} rows from {} into {}",
        source.describe(),
        store.describe()
    );
    if let Some(sheet) = &args.sheet {
        let mut backup = open_sheets(config, sheet)?;
        let rows = backup
            .replace_with_frame(&intake)
            .with_context(|| format!("write worksheet {sheet}"))?;
        println!("Copied {rows} rows into {}", backup.describe());
    }
    Ok(())
}
