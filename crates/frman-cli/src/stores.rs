//! Store construction from `config.yml`.

use anyhow::{Context, Result};
use frman_config::{AppConfig, SourceKind, StoreKind};
use frman_store::{
    AirtableConfig, AirtableStore, CsvSnapshot, RecordStore, SheetsConfig, SheetsStore, SqlStore,
};
use tracing::debug;

/// Open the store the intake rows are read from.
pub fn open_source(config: &AppConfig) -> Result<Box<dyn RecordStore>> {
    let section = &config.migration.source;
    let store: Box<dyn RecordStore> = match section.kind {
        SourceKind::Sheets => Box::new(open_sheets(config, &section.table)?),
        SourceKind::Sql => Box::new(open_sql(config, &section.table)?),
        SourceKind::Csv => {
            let path = section
                .path
                .as_deref()
                .context("migration.source.path is required for a csv source")?;
            Box::new(CsvSnapshot::new(config.resolve_path(path)))
        }
    };
    debug!(store = %store.describe(), "opened source");
    Ok(store)
}

/// Open a writable store bound to `table`.
pub fn open_store(config: &AppConfig, kind: StoreKind, table: &str) -> Result<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match kind {
        StoreKind::Airtable => Box::new(open_airtable(config, table)?),
        StoreKind::Sql => Box::new(open_sql(config, table)?),
    };
    debug!(store = %store.describe(), "opened store");
    Ok(store)
}

pub fn open_sql(config: &AppConfig, table: &str) -> Result<SqlStore> {
    let path = config.sql_db_path()?;
    SqlStore::open(&path, table)
        .with_context(|| format!("open SQLite database {}", path.display()))
}

fn open_airtable(config: &AppConfig, table: &str) -> Result<AirtableStore> {
    let section = config.airtable()?;
    let settings = AirtableConfig {
        endpoint: section.endpoint.clone(),
        base: section.base.clone(),
        api_key: section.api_key.clone(),
        timeout_secs: section.timeout_secs,
    };
    AirtableStore::new(settings, table).with_context(|| format!("connect to Airtable table {table}"))
}

pub fn open_sheets(config: &AppConfig, sheet: &str) -> Result<SheetsStore> {
    let section = config.sheets()?;
    let settings = SheetsConfig {
        endpoint: section.endpoint.clone(),
        sheet_id: section.sheet_id.clone(),
        token: section.token.clone(),
        timeout_secs: section.timeout_secs,
    };
    SheetsStore::new(settings, sheet).with_context(|| format!("open worksheet {sheet}"))
}
