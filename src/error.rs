use chatbook_common::CommonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatbookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Telemetry(String),

    #[error("TUI error: {0}")]
    Tui(String),
}

pub type Result<T> = std::result::Result<T, ChatbookError>;
