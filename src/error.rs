use thiserror::Error;

/// Failures from the key-value store behind high scores and settings
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend is not available: {0}")]
    Unavailable(String),
    #[error("Storage rejected write to '{key}': {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("Could not encode value for storage")]
    Encode(#[from] serde_json::Error),
}

/// Failures loading or validating game tuning
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid tuning value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
