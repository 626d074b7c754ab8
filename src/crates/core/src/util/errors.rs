//! Error types shared across the core crate.

use thiserror::Error;

pub type CadPilotResult<T> = Result<T, CadPilotError>;

#[derive(Debug, Error)]
pub enum CadPilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI client error: {0}")]
    AiClient(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
