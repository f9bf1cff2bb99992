//! Intake row transformation.
//!
//! Everything in this crate is a pure function over rows and frames:
//! vocabulary matching, language splitting, postal and phone lookups, the
//! details blob, retention selection and source fingerprints. I/O lives in
//! `frman-store` and the pipeline in `frman-cli`.

pub mod details;
pub mod error;
pub mod language;
pub mod needs;
pub mod phone;
pub mod postal;
pub mod record;
pub mod retention;
pub mod source_key;

pub use details::{DetailsInput, render_details};
pub use error::{Result, TransformError};
pub use language::{LANGUAGE_COLUMN, LanguageSplitResult, split_by_language};
pub use needs::{normalize_needs, unique_needs};
pub use phone::PhoneFormatter;
pub use postal::PostalLookup;
pub use record::{RecordTransformer, RowNote, Transformed};
pub use retention::{RetentionAction, RetentionRule, parse_timestamp, select_expired};
pub use source_key::source_key;
