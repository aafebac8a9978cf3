use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset root not found or not a directory: {0}")]
    DatasetRoot(PathBuf),

    #[error("Could not read {path} with any delimiter/encoding combination")]
    Unreadable { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
