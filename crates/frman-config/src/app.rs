//! Application configuration (`config/config.yml`).
//!
//! The file mirrors the layout the migration scripts have always used:
//! one section per record store plus a `migration` section describing which
//! store plays which role. Connection sections are optional until a role
//! selects them; [`AppConfig::validate`] enforces that.

use std::fs;
use std::path::{Path, PathBuf};

use frman_model::DestinationFields;
use serde::{Deserialize, Serialize};

use crate::env::{interpolate_value, process_env};
use crate::error::{ConfigError, Result};

/// Airtable REST endpoint used when the config does not override it.
pub const DEFAULT_AIRTABLE_ENDPOINT: &str = "https://api.airtable.com/v0";

/// Google Sheets values endpoint used when the config does not override it.
pub const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const INLINE_SOURCE: &str = "<inline>";

fn default_timeout_secs() -> u64 {
    30
}

/// Logging defaults; CLI flags and `RUST_LOG` take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
    pub timestamps: Option<bool>,
}

/// SQLite snapshot database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlSection {
    pub db_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirtableSection {
    pub base: String,
    pub api_key: String,
    #[serde(default = "default_airtable_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_airtable_endpoint() -> String {
    DEFAULT_AIRTABLE_ENDPOINT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsSection {
    /// OAuth bearer token, usually `${GOOGLE_SHEETS_TOKEN}`.
    pub token: String,
    pub sheet_id: String,
    #[serde(default = "default_sheets_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sheets_endpoint() -> String {
    DEFAULT_SHEETS_ENDPOINT.to_string()
}

/// Where intake rows are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Sheets,
    Sql,
    Csv,
}

/// Stores that accept writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Airtable,
    Sql,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub kind: SourceKind,
    /// Worksheet name, SQL table or query.
    pub table: String,
    /// CSV export path when `kind: csv`.
    pub path: Option<PathBuf>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            kind: SourceKind::Sheets,
            table: "Requests".to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationSection {
    pub kind: StoreKind,
    pub table: String,
    pub fields: DestinationFields,
}

impl Default for DestinationSection {
    fn default() -> Self {
        Self {
            kind: StoreKind::Airtable,
            table: "Requests".to_string(),
            fields: DestinationFields::default(),
        }
    }
}

/// Reference table used to build the postal-code lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSection {
    pub kind: StoreKind,
    pub table: String,
    pub id_column: String,
    pub postal_column: String,
}

impl Default for ReferenceSection {
    fn default() -> Self {
        Self {
            kind: StoreKind::Airtable,
            table: "Cities".to_string(),
            id_column: "id".to_string(),
            postal_column: "Zip".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionMode {
    #[default]
    Flag,
    Delete,
}

/// Post-insert cleanup of stale destination records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Timestamp column compared against the threshold.
    #[serde(default = "default_retention_field")]
    pub field: String,
    pub max_age_days: u32,
    #[serde(default)]
    pub action: RetentionMode,
    /// Field set to `true` when `action: flag`.
    #[serde(default = "default_flag_field")]
    pub flag_field: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

fn default_retention_field() -> String {
    "createdTime".to_string()
}

fn default_flag_field() -> String {
    "Expired".to_string()
}

fn default_id_column() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSection {
    pub vocabulary_file: PathBuf,
    /// ISO region used when a phone number has no country prefix.
    pub default_region: String,
    /// Transform Spanish responses as well as English ones.
    pub include_spanish: bool,
    pub source: SourceSection,
    pub destination: DestinationSection,
    pub reference: ReferenceSection,
    pub retention: Option<RetentionConfig>,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            vocabulary_file: PathBuf::from("vocabulary.yml"),
            default_region: "US".to_string(),
            include_spanish: false,
            source: SourceSection::default(),
            destination: DestinationSection::default(),
            reference: ReferenceSection::default(),
            retention: None,
        }
    }
}

/// Parsed `config.yml`. Constructed once and passed by reference; nothing
/// in the workspace holds it globally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logger: LoggerSection,
    pub sql: Option<SqlSection>,
    pub airtable: Option<AirtableSection>,
    pub google_sheets: Option<SheetsSection>,
    pub migration: MigrationSection,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate a config file, interpolating from the process
    /// environment.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let mut config = Self::parse(&text, path, &process_env)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate in-memory YAML with a custom variable lookup.
    pub fn from_yaml_str_with<F>(text: &str, lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::parse(text, Path::new(INLINE_SOURCE), lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::from_yaml_str_with(text, &process_env)
    }

    fn parse<F>(text: &str, origin: &Path, lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ConfigError::yaml(origin, e))?;
        let resolved = interpolate_value(raw, lookup);
        if resolved.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(resolved).map_err(|e| ConfigError::yaml(origin, e))
    }

    /// Check that every store selected by the `migration` section has its
    /// connection settings.
    pub fn validate(&self) -> Result<()> {
        let migration = &self.migration;
        match migration.source.kind {
            SourceKind::Sheets => {
                self.sheets()?;
            }
            SourceKind::Sql => {
                self.sql()?;
            }
            SourceKind::Csv => {
                if migration.source.path.is_none() {
                    return Err(ConfigError::missing("migration.source.path"));
                }
            }
        }
        self.require_store(migration.destination.kind)?;
        self.require_store(migration.reference.kind)?;
        require_text("migration.destination.table", &migration.destination.table)?;
        require_text("migration.reference.table", &migration.reference.table)?;
        require_text("migration.default_region", &migration.default_region)?;
        if let Some(retention) = &migration.retention
            && retention.max_age_days == 0
        {
            return Err(ConfigError::InvalidValue {
                key: "migration.retention.max_age_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn require_store(&self, kind: StoreKind) -> Result<()> {
        match kind {
            StoreKind::Airtable => self.airtable().map(|_| ()),
            StoreKind::Sql => self.sql().map(|_| ()),
        }
    }

    pub fn airtable(&self) -> Result<&AirtableSection> {
        let section = self
            .airtable
            .as_ref()
            .ok_or_else(|| ConfigError::missing("airtable"))?;
        require_text("airtable.base", &section.base)?;
        require_text("airtable.api_key", &section.api_key)?;
        Ok(section)
    }

    pub fn sheets(&self) -> Result<&SheetsSection> {
        let section = self
            .google_sheets
            .as_ref()
            .ok_or_else(|| ConfigError::missing("google_sheets"))?;
        require_text("google_sheets.token", &section.token)?;
        require_text("google_sheets.sheet_id", &section.sheet_id)?;
        Ok(section)
    }

    pub fn sql(&self) -> Result<&SqlSection> {
        self.sql.as_ref().ok_or_else(|| ConfigError::missing("sql"))
    }

    /// Resolve a config-relative path.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.resolve_path(&self.migration.vocabulary_file)
    }

    pub fn sql_db_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_path(&self.sql()?.db_file))
    }
}

fn require_text(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ConfigError::missing(key))
    } else {
        Ok(())
    }
}
