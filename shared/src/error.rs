use thiserror::Error;
use validator::ValidationErrors;
use serde_json::Error as JsonError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum ResolverError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Invalid configuration document: {0}")]
    InvalidDocument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Backend API URL is not configured")]
    Unconfigured,
}

impl From<ValidationErrors> for ResolverError {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidDocument(errors.to_string())
    }
}

impl From<JsonError> for ResolverError {
    fn from(error: JsonError) -> Self {
        Self::InvalidDocument(error.to_string())
    }
}

impl From<url::ParseError> for ResolverError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidUrl(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
