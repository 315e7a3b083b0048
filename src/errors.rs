// subtreerestore/src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Top node {0} could not be found or restored")]
    TopNodeUnresolved(i64),

    #[error("Publish failed: {0}")]
    Publish(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
