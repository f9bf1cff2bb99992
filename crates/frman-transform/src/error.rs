//! Error types for intake transformation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// A matched need phrase has no destination tag.
    #[error("need '{phrase}' has no destination tag mapping")]
    UnmappedNeed { phrase: String },

    #[error("unknown phone region '{region}'")]
    UnknownRegion { region: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<frman_ingest::IngestError> for TransformError {
    fn from(err: frman_ingest::IngestError) -> Self {
        match err {
            frman_ingest::IngestError::ColumnNotFound { column } => Self::MissingColumn { column },
            other => Self::DataFrame {
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

pub(crate) fn missing_column(column: &str) -> TransformError {
    TransformError::MissingColumn {
        column: column.to_string(),
    }
}
