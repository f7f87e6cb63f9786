//! Error types for the HuCit knowledge base

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KbError {
    #[error("URN parsing error: {0}")]
    UrnParse(String),

    #[error("URN validation error: {0}")]
    UrnValidation(String),

    #[error("Invalid URN format: {0}")]
    InvalidUrnFormat(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Store is read-only: {0}")]
    ReadOnlyStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(String),
}

impl From<regex::Error> for KbError {
    fn from(err: regex::Error) -> Self {
        KbError::Regex(err.to_string())
    }
}

impl From<reqwest::Error> for KbError {
    fn from(err: reqwest::Error) -> Self {
        KbError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KbError>;
