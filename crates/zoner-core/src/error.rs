use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ZonerError {
    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("failed to parse extraction input: {0}")]
    InputParse(String),

    #[error("failed to parse amount: {0}")]
    Parse(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
