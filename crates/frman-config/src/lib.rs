//! Configuration for the FRMAN migration tools.
//!
//! Two YAML files drive a run: `config.yml` ([`AppConfig`]) with store
//! connections and the migration layout, and `vocabulary.yml`
//! ([`Vocabulary`]) with the need phrases and language literals. Both are
//! loaded once and passed by reference.

pub mod app;
pub mod env;
pub mod error;
pub mod paths;
pub mod vocabulary;

pub use app::{
    AirtableSection, AppConfig, DestinationSection, LoggerSection, MigrationSection,
    ReferenceSection, RetentionConfig, RetentionMode, SheetsSection, SourceKind, SourceSection,
    SqlSection, StoreKind,
};
pub use env::{interpolate_str, interpolate_value, process_env};
pub use error::{ConfigError, Result};
pub use paths::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH, default_config_path};
pub use vocabulary::{LanguageSplit, Vocabulary};
