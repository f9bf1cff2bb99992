use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
