//! Error types for record store adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("invalid URL {url}: {message}")]
    Url { url: String, message: String },

    #[error("record '{id}' not found in {table}")]
    UnknownRecord { id: String, table: String },

    /// The store refused the write.
    #[error("write rejected: {message}")]
    Rejected { message: String },

    #[error(transparent)]
    Ingest(#[from] frman_ingest::IngestError),
}

impl From<polars::prelude::PolarsError> for StoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Ingest(err.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
