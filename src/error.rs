use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = SentimentError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("required file is missing: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("vectorizer mismatch: model expects {expected} features, got {found}")]
    VectorizerMismatch { expected: usize, found: usize },

    #[error(
        "model file {} has format version {found}, this build reads version {supported}",
        path.display()
    )]
    UnsupportedFormat {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("model file {} is not a reviewsense model", path.display())]
    CorruptModel { path: PathBuf },

    #[error("review log error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("model encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("stopword file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SentimentError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        SentimentError::MissingFile { path: path.into() }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        SentimentError::InvalidInput(msg.into())
    }
}
