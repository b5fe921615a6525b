//! Error types for the wallet bootstrapper

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed wallet record: {0}")]
    MalformedRecord(String),

    #[error("{0}")]
    AmbiguousRecord(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Wallet provider error: {0}")]
    Provider(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
